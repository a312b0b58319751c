//! キャラクターごとの吹き出しキュー
//!
//! 表示中の吹き出しを新しい順に保持し、上限超過時の追い出し・表示時間・
//! 出現/退場アニメーション・装飾の表示切り替えをフレーム単位で進める。

use super::channel::{ChannelPolicy, ChatChannel};
use super::config::ChatBubbleConfig;
use super::entry::{BubbleEntry, BubbleId, BubblePhase};
use super::visuals::BubbleVisuals;
use crate::error::ChatBubbleError;
use crate::systems::utils::animations::ScaleTransition;
use bevy::prelude::*;
use std::collections::VecDeque;

/// 吹き出しが1つ以上ある間だけ表示する装飾のスケール
#[derive(Debug, Clone, Default)]
struct ContainerVisibility {
    elements: Vec<Entity>,
    scale: f32,
    transition: Option<ScaleTransition>,
}

/// キャラクターに付ける吹き出しコントローラー
#[derive(Component, Debug)]
pub struct ChatBubbleController {
    /// false の間はメッセージを受けても吹き出しを出さない
    pub enabled: bool,
    /// 表示中の吹き出し (先頭 = 最新, 末尾 = 最古)
    entries: VecDeque<BubbleEntry>,
    /// キューから外れて退場アニメーション中のもの
    exiting: Vec<BubbleEntry>,
    current_tint: Color,
    container: ContainerVisibility,
    next_id: u64,
}

impl Default for ChatBubbleController {
    fn default() -> Self {
        Self {
            enabled: true,
            entries: VecDeque::new(),
            exiting: Vec::new(),
            current_tint: Color::WHITE,
            container: ContainerVisibility::default(),
            next_id: 0,
        }
    }
}

impl ChatBubbleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decorations(mut self, decorations: impl IntoIterator<Item = Entity>) -> Self {
        self.container.elements.extend(decorations);
        self
    }

    pub fn add_decoration(&mut self, decoration: Entity) {
        self.container.elements.push(decoration);
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// 表示中の吹き出し（新しい順）
    pub fn entries(&self) -> impl Iterator<Item = &BubbleEntry> {
        self.entries.iter()
    }

    pub fn exiting(&self) -> impl Iterator<Item = &BubbleEntry> {
        self.exiting.iter()
    }

    pub fn entry(&self, id: BubbleId) -> Option<&BubbleEntry> {
        self.entries
            .iter()
            .chain(self.exiting.iter())
            .find(|entry| entry.id == id)
    }

    pub fn current_tint(&self) -> Color {
        self.current_tint
    }

    pub fn container_scale(&self) -> f32 {
        self.container.scale
    }

    /// メッセージを吹き出しとして表示する
    ///
    /// チャンネルが非表示設定なら何もせず `Ok(false)`。
    /// 設定やテンプレートに不備があれば状態を変えずにエラーを返す。
    pub fn show(
        &mut self,
        owner: Entity,
        text: &str,
        channel: ChatChannel,
        policy: &ChannelPolicy,
        config: &ChatBubbleConfig,
        visuals: &mut impl BubbleVisuals,
    ) -> Result<bool, ChatBubbleError> {
        let Some(tint) = policy.check(channel) else {
            return Ok(false);
        };

        config.validate()?;
        visuals.check_ready()?;
        let element = visuals.spawn_bubble(owner, text)?;

        self.current_tint = tint;
        for &decoration in &self.container.elements {
            visuals.set_tint(decoration, tint);
        }

        // 上限に達していれば最も古いものを待ち時間なしで退場させる
        while self.entries.len() >= config.max_bubbles {
            let Some(mut oldest) = self.entries.pop_back() else {
                break;
            };
            debug!(
                "BUBBLE: {:?} evicted bubble {:?} ({:?})",
                owner, oldest.id, oldest.phase
            );
            oldest.evicted = true;
            self.begin_exit(oldest, config);
        }

        let id = BubbleId(self.next_id);
        self.next_id += 1;

        let mut entry = BubbleEntry::new(
            id,
            text.to_string(),
            element,
            visuals.natural_scale(),
            config.display_duration(text),
        );
        entry.set_tint(tint, visuals);
        entry.transition_in(config.transition_duration, visuals);
        debug!(
            "BUBBLE: {:?} shows bubble {:?} on {:?} for {:.2}s",
            owner, id, channel, entry.remaining
        );
        self.entries.push_front(entry);
        self.refresh_container(config);

        Ok(true)
    }

    /// 吹き出しの退場を要求する
    ///
    /// 順番どおりに消す設定なら、より古い吹き出しが消えるまで待ってから退場する。
    /// 既に退場中・破棄済みのハンドルには何もしない (false)。
    pub fn remove_entry(&mut self, id: BubbleId, config: &ChatBubbleConfig) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        entry.removal_requested = true;
        self.flush_removals(config);
        true
    }

    /// 1フレーム進める。退場アニメーションを終えて破棄した吹き出しを返す
    pub fn tick(
        &mut self,
        dt: f32,
        config: &ChatBubbleConfig,
        visuals: &mut impl BubbleVisuals,
    ) -> Vec<BubbleEntry> {
        for entry in self.entries.iter_mut() {
            match entry.phase {
                BubblePhase::Entering => {
                    if entry.step_transition(dt, visuals) {
                        entry.phase = BubblePhase::Visible;
                    }
                }
                BubblePhase::Visible if !entry.removal_requested => {
                    entry.remaining -= dt;
                    if entry.remaining <= 0.0 {
                        entry.removal_requested = true;
                    }
                }
                _ => {}
            }
        }

        self.flush_removals(config);

        let mut removed = Vec::new();
        let mut still_exiting = Vec::with_capacity(self.exiting.len());
        for mut entry in self.exiting.drain(..) {
            if entry.step_transition(dt, visuals) {
                visuals.despawn_bubble(entry.element);
                entry.phase = BubblePhase::Removed;
                removed.push(entry);
            } else {
                still_exiting.push(entry);
            }
        }
        self.exiting = still_exiting;

        self.step_container(dt, visuals);

        removed
    }

    /// 退場要求済みの吹き出しをキューから外して縮小を始める
    fn flush_removals(&mut self, config: &ChatBubbleConfig) {
        if config.bubbles_must_expire_in_order {
            // 最古のものが退場するまで新しいものは待つ
            while self
                .entries
                .back()
                .is_some_and(|oldest| oldest.removal_requested)
            {
                if let Some(oldest) = self.entries.pop_back() {
                    self.begin_exit(oldest, config);
                }
            }
        } else {
            let mut index = self.entries.len();
            // 古い方から順に外す
            while index > 0 {
                index -= 1;
                if self.entries[index].removal_requested {
                    if let Some(entry) = self.entries.remove(index) {
                        self.begin_exit(entry, config);
                    }
                }
            }
        }
    }

    fn begin_exit(&mut self, mut entry: BubbleEntry, config: &ChatBubbleConfig) {
        entry.removal_requested = false;
        entry.transition_out(config.transition_duration);
        self.exiting.push(entry);
        self.refresh_container(config);
    }

    /// 表示数が変わるたびに装飾のトランジションを最新の目標でやり直す
    fn refresh_container(&mut self, config: &ChatBubbleConfig) {
        let target = if self.entries.is_empty() { 0.0 } else { 1.0 };
        self.container.transition = Some(ScaleTransition::new(
            self.container.scale,
            target,
            config.transition_duration,
        ));
    }

    fn step_container(&mut self, dt: f32, visuals: &mut impl BubbleVisuals) {
        let Some(transition) = self.container.transition.as_mut() else {
            return;
        };

        if let Some(value) = transition.step(dt) {
            let mut applied = self.container.elements.is_empty();
            for &element in &self.container.elements {
                applied |= visuals.set_scale(element, Vec3::splat(value));
            }
            if applied {
                self.container.scale = value;
            } else {
                transition.cancel();
            }
        }

        if transition.is_finished() {
            self.container.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DT: f32 = 0.1;

    struct FakeVisuals {
        world: World,
        ready: Result<(), ChatBubbleError>,
        scales: HashMap<Entity, Vec3>,
        tints: HashMap<Entity, Color>,
        despawned: Vec<Entity>,
    }

    impl FakeVisuals {
        fn new() -> Self {
            Self {
                world: World::new(),
                ready: Ok(()),
                scales: HashMap::new(),
                tints: HashMap::new(),
                despawned: Vec::new(),
            }
        }

        fn character(&mut self) -> Entity {
            self.world.spawn_empty().id()
        }

        fn decoration(&mut self) -> Entity {
            let entity = self.world.spawn_empty().id();
            self.scales.insert(entity, Vec3::ZERO);
            entity
        }
    }

    impl BubbleVisuals for FakeVisuals {
        fn check_ready(&self) -> Result<(), ChatBubbleError> {
            self.ready.clone()
        }

        fn natural_scale(&self) -> Vec3 {
            Vec3::ONE
        }

        fn spawn_bubble(&mut self, _parent: Entity, _text: &str) -> Result<Entity, ChatBubbleError> {
            self.check_ready()?;
            let entity = self.world.spawn_empty().id();
            self.scales.insert(entity, Vec3::ZERO);
            Ok(entity)
        }

        fn set_scale(&mut self, element: Entity, scale: Vec3) -> bool {
            match self.scales.get_mut(&element) {
                Some(current) => {
                    *current = scale;
                    true
                }
                None => false,
            }
        }

        fn set_tint(&mut self, element: Entity, tint: Color) {
            self.tints.insert(element, tint);
        }

        fn despawn_bubble(&mut self, element: Entity) {
            self.scales.remove(&element);
            self.despawned.push(element);
        }
    }

    fn config(in_order: bool) -> ChatBubbleConfig {
        ChatBubbleConfig {
            min_duration: 3.0,
            max_duration: 10.0,
            extra_duration_per_character: 0.1,
            transition_duration: 1.0,
            max_bubbles: 3,
            bubbles_must_expire_in_order: in_order,
        }
    }

    /// 指定秒数ぶん tick し、破棄された順にハンドルを返す
    fn run(
        controller: &mut ChatBubbleController,
        visuals: &mut FakeVisuals,
        config: &ChatBubbleConfig,
        seconds: f32,
    ) -> Vec<BubbleId> {
        let steps = (seconds / DT).round() as usize;
        let mut removed = Vec::new();
        for _ in 0..steps {
            removed.extend(controller.tick(DT, config, visuals).iter().map(|e| e.id()));
        }
        removed
    }

    fn texts(controller: &ChatBubbleController) -> Vec<&str> {
        controller.entries().map(|entry| entry.text()).collect()
    }

    #[test]
    fn hidden_channel_is_not_admitted() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let mut policy = ChannelPolicy::default();
        policy.set_visible(ChatChannel::Whisper, false);
        let mut controller = ChatBubbleController::new();

        let shown = controller
            .show(owner, "psst", ChatChannel::Whisper, &policy, &config(true), &mut visuals)
            .unwrap();

        assert!(!shown);
        assert_eq!(controller.active_count(), 0);
        assert!(visuals.scales.is_empty());
    }

    #[test]
    fn active_count_never_exceeds_capacity() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        for i in 0..10 {
            let text = format!("message {i}");
            assert!(
                controller
                    .show(owner, &text, ChatChannel::Local, &policy, &config, &mut visuals)
                    .unwrap()
            );
            assert!(controller.active_count() <= config.max_bubbles);
            run(&mut controller, &mut visuals, &config, 0.3);
            assert!(controller.active_count() <= config.max_bubbles);
        }
    }

    #[test]
    fn full_queue_evicts_the_oldest_bubble() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        for text in ["A", "B", "C"] {
            controller
                .show(owner, text, ChatChannel::Local, &policy, &config, &mut visuals)
                .unwrap();
            run(&mut controller, &mut visuals, &config, 0.5);
        }
        assert_eq!(texts(&controller), ["C", "B", "A"]);

        controller
            .show(owner, "D", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();

        assert_eq!(texts(&controller), ["D", "C", "B"]);
        let evicted: Vec<_> = controller.exiting().collect();
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].text(), "A");
        assert!(evicted[0].is_evicted());
        assert_eq!(evicted[0].phase(), BubblePhase::Exiting);
    }

    #[test]
    fn evicted_bubble_still_animates_out() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = ChatBubbleConfig {
            max_bubbles: 1,
            ..config(true)
        };
        let mut controller = ChatBubbleController::new();

        controller
            .show(owner, "first", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        run(&mut controller, &mut visuals, &config, 1.5);
        let first = controller.entries().next().unwrap().element();
        assert_eq!(visuals.scales[&first], Vec3::ONE);

        controller
            .show(owner, "second", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        run(&mut controller, &mut visuals, &config, 0.5);
        let half = visuals.scales[&first].x;
        assert!(half > 0.0 && half < 1.0, "got {half}");
        assert!(!visuals.despawned.contains(&first));

        run(&mut controller, &mut visuals, &config, 0.6);
        assert!(visuals.despawned.contains(&first));
        assert_eq!(controller.exiting().count(), 0);
        assert_eq!(texts(&controller), ["second"]);
    }

    #[test]
    fn in_order_expiry_holds_newer_bubbles_back() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        // 3 + 6.0 = 9秒
        let long = "x".repeat(60);
        controller
            .show(owner, &long, ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        // 3 + 0.2 = 3.2秒
        controller
            .show(owner, "hi", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        let long_id = controller.entries().last().unwrap().id();
        let short_id = controller.entries().next().unwrap().id();

        let removed = run(&mut controller, &mut visuals, &config, 6.0);
        assert!(removed.is_empty());
        let short = controller.entry(short_id).unwrap();
        assert!(short.is_waiting_to_exit());
        assert_eq!(short.phase(), BubblePhase::Visible);
        assert_eq!(controller.active_count(), 2);

        let removed = run(&mut controller, &mut visuals, &config, 8.0);
        assert_eq!(removed, [long_id, short_id]);
        assert!(!controller.is_active());
    }

    #[test]
    fn eviction_skips_the_wait_and_releases_waiting_bubbles() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = ChatBubbleConfig {
            max_bubbles: 2,
            ..config(true)
        };
        let mut controller = ChatBubbleController::new();

        // 9秒表示
        let long = "x".repeat(60);
        controller
            .show(owner, &long, ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        // 3.2秒表示。古い方が残っている間は待たされる
        controller
            .show(owner, "hi", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        let long_id = controller.entries().last().unwrap().id();
        let short_id = controller.entries().next().unwrap().id();

        let removed = run(&mut controller, &mut visuals, &config, 6.0);
        assert!(removed.is_empty());
        assert!(controller.entry(short_id).unwrap().is_waiting_to_exit());

        controller
            .show(owner, "C", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        let newest_id = controller.entries().next().unwrap().id();

        let evicted = controller.entry(long_id).unwrap();
        assert!(evicted.is_evicted());
        assert_eq!(evicted.phase(), BubblePhase::Exiting);
        assert_eq!(texts(&controller), ["C", "hi"]);

        // 追い出しでキューを抜けたので、待っていた吹き出しは次の tick で退場を始める
        let mut removed = controller
            .tick(DT, &config, &mut visuals)
            .iter()
            .map(|entry| entry.id())
            .collect::<Vec<_>>();
        assert_eq!(texts(&controller), ["C"]);
        assert_eq!(
            controller.entry(short_id).unwrap().phase(),
            BubblePhase::Exiting
        );
        assert!(!controller.entry(short_id).unwrap().is_evicted());

        removed.extend(run(&mut controller, &mut visuals, &config, 8.0));
        assert_eq!(removed, [long_id, short_id, newest_id]);
        assert!(!controller.is_active());
    }

    #[test]
    fn unordered_expiry_lets_short_messages_leave_first() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(false);
        let mut controller = ChatBubbleController::new();

        let long = "x".repeat(60);
        controller
            .show(owner, &long, ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        controller
            .show(owner, "hi", ChatChannel::Party, &policy, &config, &mut visuals)
            .unwrap();
        let long_id = controller.entries().last().unwrap().id();
        let short_id = controller.entries().next().unwrap().id();

        let removed = run(&mut controller, &mut visuals, &config, 6.0);
        assert_eq!(removed, [short_id]);
        assert_eq!(controller.active_count(), 1);

        let removed = run(&mut controller, &mut visuals, &config, 8.0);
        assert_eq!(removed, [long_id]);
    }

    #[test]
    fn removing_a_stale_handle_does_nothing() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(false);
        let mut controller = ChatBubbleController::new();

        controller
            .show(owner, "bye", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        let id = controller.entries().next().unwrap().id();

        assert!(controller.remove_entry(id, &config));
        assert_eq!(controller.active_count(), 0);
        assert_eq!(controller.exiting().count(), 1);

        assert!(!controller.remove_entry(id, &config));
        assert_eq!(controller.exiting().count(), 1);

        let removed = run(&mut controller, &mut visuals, &config, 1.5);
        assert_eq!(removed, [id]);
        assert!(!controller.remove_entry(id, &config));
        assert_eq!(visuals.despawned.len(), 1);
    }

    #[test]
    fn manual_removal_waits_for_older_bubbles_in_order() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        for text in ["old", "new"] {
            controller
                .show(owner, text, ChatChannel::Local, &policy, &config, &mut visuals)
                .unwrap();
        }
        let old_id = controller.entries().last().unwrap().id();
        let new_id = controller.entries().next().unwrap().id();

        assert!(controller.remove_entry(new_id, &config));
        assert_eq!(controller.active_count(), 2);

        assert!(controller.remove_entry(old_id, &config));
        assert_eq!(controller.active_count(), 0);
        assert_eq!(controller.exiting().count(), 2);
    }

    #[test]
    fn missing_template_fails_without_touching_state() {
        let mut visuals = FakeVisuals::new();
        visuals.ready = Err(ChatBubbleError::MissingTemplate);
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let mut controller = ChatBubbleController::new();

        let result = controller.show(
            owner,
            "hello",
            ChatChannel::Guild,
            &policy,
            &config(true),
            &mut visuals,
        );

        assert_eq!(result, Err(ChatBubbleError::MissingTemplate));
        assert_eq!(controller.active_count(), 0);
        assert_eq!(controller.current_tint(), Color::WHITE);
        assert!(visuals.scales.is_empty());
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let config = ChatBubbleConfig {
            max_bubbles: 0,
            ..config(true)
        };
        let mut controller = ChatBubbleController::new();

        let result = controller.show(
            owner,
            "hello",
            ChatChannel::Local,
            &ChannelPolicy::default(),
            &config,
            &mut visuals,
        );

        assert!(matches!(result, Err(ChatBubbleError::InvalidConfig(_))));
        assert_eq!(controller.active_count(), 0);
    }

    #[test]
    fn tint_follows_the_channel() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let decoration = visuals.decoration();
        let policy = ChannelPolicy::default();
        let mut controller = ChatBubbleController::new();
        controller.add_decoration(decoration);

        controller
            .show(owner, "team up", ChatChannel::Party, &policy, &config(true), &mut visuals)
            .unwrap();

        let party = policy.check(ChatChannel::Party).unwrap();
        let entry = controller.entries().next().unwrap();
        assert_eq!(entry.tint(), party);
        assert_eq!(visuals.tints[&entry.element()], party);
        assert_eq!(visuals.tints[&decoration], party);
        assert_eq!(controller.current_tint(), party);
    }

    #[test]
    fn decorations_follow_the_active_count() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let decoration = visuals.decoration();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new().with_decorations([decoration]);

        controller
            .show(owner, "hey", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        run(&mut controller, &mut visuals, &config, 1.2);
        assert_eq!(visuals.scales[&decoration], Vec3::ONE);
        assert_eq!(controller.container_scale(), 1.0);

        // 1 + 3.3 秒表示した後、退場で装飾も縮む
        run(&mut controller, &mut visuals, &config, 5.0);
        assert!(!controller.is_active());
        assert_eq!(visuals.scales[&decoration], Vec3::ZERO);
        assert_eq!(controller.container_scale(), 0.0);
    }

    #[test]
    fn missing_element_ends_the_transition_without_writing() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        controller
            .show(owner, "gone", ChatChannel::Local, &policy, &config, &mut visuals)
            .unwrap();
        let element = controller.entries().next().unwrap().element();
        visuals.scales.remove(&element);

        run(&mut controller, &mut visuals, &config, 0.2);
        let entry = controller.entries().next().unwrap();
        assert_eq!(entry.phase(), BubblePhase::Visible);
        assert_eq!(entry.scale(), 0.0);
    }

    #[test]
    fn bubble_grows_to_natural_scale() {
        let mut visuals = FakeVisuals::new();
        let owner = visuals.character();
        let policy = ChannelPolicy::default();
        let config = config(true);
        let mut controller = ChatBubbleController::new();

        controller
            .show(owner, "hello", ChatChannel::Global, &policy, &config, &mut visuals)
            .unwrap();
        let element = controller.entries().next().unwrap().element();
        assert_eq!(visuals.scales[&element], Vec3::ZERO);

        run(&mut controller, &mut visuals, &config, 0.5);
        let mid = visuals.scales[&element].x;
        assert!(mid > 0.0 && mid < 1.0, "got {mid}");

        run(&mut controller, &mut visuals, &config, 0.6);
        assert_eq!(visuals.scales[&element], Vec3::ONE);
        assert_eq!(
            controller.entries().next().unwrap().phase(),
            BubblePhase::Visible
        );
    }
}
