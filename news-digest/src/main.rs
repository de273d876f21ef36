use anyhow::Context;
use tracing::{Instrument, error, info, info_span};

use news_digest::{app::DigestJob, config::Config, observability::Telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(message, "panic occurred without location information");
        }
    }));

    let telemetry = Telemetry::init().context("failed to initialize tracing")?;
    let config = Config::from_env().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    let job = DigestJob::from_config(&config).context("failed to build digest job")?;
    let outcome = job.run().instrument(info_span!("digest_run")).await;
    info!(?outcome, "digest run finished");

    telemetry.shutdown();
    Ok(())
}
