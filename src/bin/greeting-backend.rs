//! Backend that greets with its instance identity.

use clap::Parser;
use tokio::net::TcpListener;

use routing_fixtures::fixtures::greeting::{self, Greeting};
use routing_fixtures::lifecycle::{signals, startup, Shutdown};
use routing_fixtures::observability::logging;

#[derive(Parser)]
#[command(name = "greeting-backend")]
#[command(about = "Answers with a greeting and the instance index/guid", long_about = None)]
struct Args {
    /// Greeting to answer with ("hello", "hola", ...).
    #[arg(short, long, default_value = "hello")]
    greeting: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::platform_config()?;
    logging::init_logging(&config.observability);

    let greeting = Greeting::from_env(args.greeting);
    tracing::info!(
        greeting = %greeting.greeting,
        instance_index = %greeting.instance_index,
        "greeting backend starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::serve(greeting::router(greeting), listener, shutdown.subscribe()).await?;
    Ok(())
}
