use crate::constants::*;
use bevy::prelude::*;

/// チャットの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatChannel {
    Local,
    Global,
    Whisper,
    Party,
    Guild,
    /// システム通知。吹き出しの対象外
    System,
}

/// チャンネルごとの表示設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRule {
    pub visible: bool,
    pub tint: Color,
}

impl ChannelRule {
    pub const fn shown(tint: Color) -> Self {
        Self {
            visible: true,
            tint,
        }
    }
}

/// どのチャンネルを吹き出しにするか、何色で出すか
/// UI などの外部設定から書き換えられる。吹き出し側は読むだけ
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ChannelPolicy {
    pub local: ChannelRule,
    pub global: ChannelRule,
    pub whisper: ChannelRule,
    pub party: ChannelRule,
    pub guild: ChannelRule,
}

impl Default for ChannelPolicy {
    fn default() -> Self {
        Self {
            local: ChannelRule::shown(CHAT_TINT_LOCAL),
            global: ChannelRule::shown(CHAT_TINT_GLOBAL),
            whisper: ChannelRule::shown(CHAT_TINT_WHISPER),
            party: ChannelRule::shown(CHAT_TINT_PARTY),
            guild: ChannelRule::shown(CHAT_TINT_GUILD),
        }
    }
}

impl ChannelPolicy {
    /// 表示するチャンネルなら色を返す
    /// 一覧にないチャンネルは常に非表示
    pub fn check(&self, channel: ChatChannel) -> Option<Color> {
        self.rule(channel)
            .filter(|rule| rule.visible)
            .map(|rule| rule.tint)
    }

    pub fn rule(&self, channel: ChatChannel) -> Option<&ChannelRule> {
        match channel {
            ChatChannel::Local => Some(&self.local),
            ChatChannel::Global => Some(&self.global),
            ChatChannel::Whisper => Some(&self.whisper),
            ChatChannel::Party => Some(&self.party),
            ChatChannel::Guild => Some(&self.guild),
            ChatChannel::System => None,
        }
    }

    /// 一覧にないチャンネルへの設定は無視する
    pub fn set_rule(&mut self, channel: ChatChannel, rule: ChannelRule) {
        let slot = match channel {
            ChatChannel::Local => &mut self.local,
            ChatChannel::Global => &mut self.global,
            ChatChannel::Whisper => &mut self.whisper,
            ChatChannel::Party => &mut self.party,
            ChatChannel::Guild => &mut self.guild,
            ChatChannel::System => return,
        };
        *slot = rule;
    }

    pub fn set_visible(&mut self, channel: ChatChannel, visible: bool) {
        if let Some(rule) = self.rule(channel).copied() {
            self.set_rule(channel, ChannelRule { visible, ..rule });
        }
    }
}
