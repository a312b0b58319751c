use super::visuals::BubbleVisuals;
use crate::systems::utils::animations::ScaleTransition;
use bevy::prelude::*;

/// 吹き出しのハンドル。値は生成順
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BubbleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubblePhase {
    /// 拡大中
    Entering,
    /// 表示中（表示時間のカウント中、または退場待ち）
    Visible,
    /// 縮小中
    Exiting,
    /// 破棄済み
    Removed,
}

/// 表示中の吹き出し1つ分
#[derive(Debug, Clone)]
pub struct BubbleEntry {
    pub(super) id: BubbleId,
    pub(super) text: String,
    pub(super) tint: Color,
    /// 見た目のエンティティ
    pub(super) element: Entity,
    pub(super) natural_scale: Vec3,
    pub(super) phase: BubblePhase,
    /// 現在のスケール係数 (0.0 = 非表示, 1.0 = 既定スケール)
    pub(super) scale: f32,
    pub(super) transition: Option<ScaleTransition>,
    /// 残り表示時間（秒）。出現アニメーション完了後に減り始める
    pub(super) remaining: f32,
    /// 表示時間を使い切って退場を待っている
    pub(super) removal_requested: bool,
    /// 上限超過で追い出された
    pub(super) evicted: bool,
}

impl BubbleEntry {
    pub(super) fn new(
        id: BubbleId,
        text: String,
        element: Entity,
        natural_scale: Vec3,
        display_duration: f32,
    ) -> Self {
        Self {
            id,
            text,
            tint: Color::WHITE,
            element,
            natural_scale,
            phase: BubblePhase::Entering,
            scale: 0.0,
            transition: None,
            remaining: display_duration,
            removal_requested: false,
            evicted: false,
        }
    }

    pub fn id(&self) -> BubbleId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn element(&self) -> Entity {
        self.element
    }

    pub fn phase(&self) -> BubblePhase {
        self.phase
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    pub fn is_waiting_to_exit(&self) -> bool {
        self.removal_requested
    }

    /// スケール0にしてから既定スケールへ拡大を始める
    pub fn transition_in(&mut self, duration: f32, visuals: &mut impl BubbleVisuals) {
        self.scale = 0.0;
        // 生成直後は見た目がまだ無いこともある。スポーン時点でスケール0なので結果は問わない
        visuals.set_scale(self.element, Vec3::ZERO);
        self.phase = BubblePhase::Entering;
        self.transition = Some(ScaleTransition::new(0.0, 1.0, duration));
    }

    /// 現在のスケールから0へ縮小を始める
    pub fn transition_out(&mut self, duration: f32) {
        self.phase = BubblePhase::Exiting;
        self.transition = Some(ScaleTransition::new(self.scale, 0.0, duration));
    }

    pub fn set_tint(&mut self, tint: Color, visuals: &mut impl BubbleVisuals) {
        self.tint = tint;
        visuals.set_tint(self.element, tint);
    }

    /// トランジションを1フレーム進める。完了したら true
    /// 見た目が消えていたら書き込まずに打ち切る（完了扱い）
    pub(super) fn step_transition(&mut self, dt: f32, visuals: &mut impl BubbleVisuals) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return true;
        };

        if let Some(value) = transition.step(dt) {
            if visuals.set_scale(self.element, self.natural_scale * value) {
                self.scale = value;
            } else {
                transition.cancel();
            }
        }

        if transition.is_finished() {
            self.transition = None;
            return true;
        }
        false
    }
}
