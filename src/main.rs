use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use featurefit::analysis::{AnalysisClient, AnalysisConfig, FeatureRequest};
use featurefit::api::{self, AppState};
use featurefit::registry::Registry;
use featurefit::report;

#[derive(Parser)]
#[command(name = "featurefit")]
#[command(about = "AI-assisted feature prioritization: RICE, risks, SWOT and roadmap")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the FeatureFit HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Analyze a single feature and print the report
    Analyze {
        /// Feature name, e.g. "AI-Powered Transaction Fraud Detection"
        #[arg(short, long)]
        feature: String,
        /// Industry, e.g. FinTech, EdTech, SaaS
        #[arg(short, long)]
        industry: String,
        /// Primary business goal
        #[arg(short, long)]
        goal: Option<String>,
        /// Business model, e.g. "B2B SaaS"
        #[arg(short = 'm', long)]
        business_model: Option<String>,
        /// Additional context describing the feature
        #[arg(short, long)]
        context: Option<String>,
        /// Override the model name
        #[arg(long)]
        model: Option<String>,
        /// Print the raw analysis JSON instead of the report
        #[arg(long)]
        json: bool,
    },
}

/// Initialize tracing with output to stderr (for report output) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "featurefit=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Analyze mode: keep stdout clean for the report
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting FeatureFit server on port {}", port);

    let mut state = AppState::new(Registry::shared());
    match AnalysisClient::from_env() {
        Ok(client) => {
            tracing::info!("Analysis enabled with model {}", client.config().model);
            state = state.with_analyzer(client);
        }
        Err(e) => tracing::warn!("Analysis endpoints disabled: {}", e),
    }

    let app = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("FeatureFit server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Analyze { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await?,
        Some(Commands::Analyze {
            feature,
            industry,
            goal,
            business_model,
            context,
            model,
            json,
        }) => {
            let mut config = AnalysisConfig::from_env();
            if let Some(model) = model {
                config.model = model;
            }
            let client = AnalysisClient::new(config)?;

            let request = FeatureRequest {
                business_goal: goal,
                business_model,
                context,
                ..FeatureRequest::new(feature, industry)
            };
            if let Some(warning) = request.validate()? {
                eprintln!("Feature name warning: {}", warning);
            }

            let analysis = client.analyze(&request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!(
                    "{}",
                    report::render_analysis(&request.feature_name, &request.industry, &analysis)
                );
            }
        }
        None => serve(3000).await?,
    }

    Ok(())
}
