pub(crate) mod tracing;

use anyhow::Result;

/// トレーシングの初期化と終了処理をまとめたハンドル。
#[derive(Debug)]
pub struct Telemetry {
    _private: (),
}

impl Telemetry {
    /// トレーシングを初期化する。複数回呼んでも初期化は一度だけ。
    ///
    /// # Errors
    /// サブスクライバの初期化に失敗した場合はエラーを返す。
    pub fn init() -> Result<Self> {
        tracing::init()?;
        Ok(Self { _private: () })
    }

    /// 未送信のスパンをフラッシュする。
    pub fn shutdown(self) {
        tracing::shutdown();
    }
}
