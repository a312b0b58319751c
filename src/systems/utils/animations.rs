//! 汎用アニメーション実装
//!
//! 吹き出しやその装飾の拡大・縮小に使うスケール補間

/// 現在値から目標値へ一定時間で線形補間するトランジション
///
/// `step` をフレームごとに呼ぶと次のスケール値を返し、最後のステップで目標値にぴったり揃える。
/// 終了後は `None` を返し続ける。やり直す場合は `new` で作り直す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransition {
    from: f32,
    to: f32,
    /// アニメーション持続時間（秒）
    duration: f32,
    /// 補間パラメータ (0.0 -> 1.0)
    progress: f32,
    finished: bool,
}

impl ScaleTransition {
    pub fn new(current: f32, target: f32, duration: f32) -> Self {
        Self {
            from: current,
            to: target,
            duration,
            progress: 0.0,
            finished: false,
        }
    }

    /// 1フレーム分進めて新しいスケール値を返す
    /// 既に完了している場合は None
    pub fn step(&mut self, dt: f32) -> Option<f32> {
        if self.finished {
            return None;
        }

        if self.duration <= 0.0 {
            self.progress = 1.0;
        } else {
            self.progress += dt.max(0.0) / self.duration;
        }

        if self.progress >= 1.0 {
            // 浮動小数点の誤差を残さないよう目標値に揃える
            self.progress = 1.0;
            self.finished = true;
            return Some(self.to);
        }

        Some(self.from + (self.to - self.from) * self.progress)
    }

    /// 対象が消えたときなど、値を書き込まずに打ち切る
    pub fn cancel(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
