use clap::Parser;

use apibind::client::{ApiClient, ClientError, ClientInput};
use apibind::hello::{hello_definition, SAY_HELLO};

#[derive(Parser)]
#[command(name = "hello-cli")]
#[command(about = "Call the greeting service of an apibind server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Message to greet with (at least three characters).
    message: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ApiClient::new(hello_definition()?, cli.url);

    let mut input = ClientInput::new();
    if let Some(message) = cli.message {
        input = input.with("message", message);
    }

    match client.call(SAY_HELLO, input).await {
        Ok(Some(greeting)) => println!("{}", greeting.to_param_string()),
        Ok(None) => {}
        Err(ClientError::Http { status, message }) => {
            eprintln!("Error: server returned status {status}");
            eprintln!("{message}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
