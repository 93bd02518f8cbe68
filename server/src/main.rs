use axum::BoxError;
use clap::Parser as _;
use server::AppStateInner;
use server::config::AppConfig;
use server::make_app;
use server::tracing_setup;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(clap::Parser)]
enum Subcommand {
    /// Run the service.
    Serve,
    /// Print the effective status message table and exit.
    Messages,
}

#[derive(clap::Parser)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_setup::init_subscribers()?;

    let args = Args::parse();
    let config = AppConfig::build()?;

    match args.subcommand {
        Subcommand::Serve => {
            let state = AppStateInner::new(config)?;
            let app = make_app(state.clone());

            let terminate = CancellationToken::new();
            tokio::spawn({
                let interrupted = terminate.clone();
                async move {
                    tokio::signal::ctrl_c()
                        .await
                        .expect("failed to listen for ctrl-c, wat");
                    interrupted.cancel();
                }
            });

            info!("Listening on http://{}", state.config.bind_address);
            let listener = tokio::net::TcpListener::bind(state.config.bind_address).await?;

            axum::serve(listener, app)
                .with_graceful_shutdown(terminate.cancelled_owned())
                .await?;
        }
        Subcommand::Messages => {
            let messages = config.status_messages()?;
            let mut entries: Vec<_> = messages.iter().collect();
            entries.sort_by_key(|(code, _)| code.as_u16());
            for (code, text) in entries {
                println!("{} {text}", code.as_u16());
            }
        }
    };

    Ok(())
}
