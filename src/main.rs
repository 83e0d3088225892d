use anyhow::Context;
use catalyst::app::functions::mentor_chat::MentorChatRequest;
use catalyst::app::functions::{EdgeFunction, MentorChat};
use catalyst::config::{AppConfig, CliConfig, Command, OutputFormat};
use catalyst::core::timetable::{self, slot_key};
use catalyst::domain::model::{TimetablePlan, TimetableRequest};
use catalyst::domain::ports::ConfigProvider;
use catalyst::utils::error::{CatalystError, ErrorSeverity};
use catalyst::utils::{logger, validation::Validate};
use catalyst::{server, AppState, ChatClient};
use clap::Parser;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting catalyst CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    if let Err(err) = run(&cli, config).await {
        match err.downcast_ref::<CatalystError>() {
            Some(e) => exit_with(e),
            None => {
                tracing::error!("❌ {:#}", err);
                eprintln!("❌ {:#}", err);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: AppConfig) -> anyhow::Result<()> {
    match &cli.command {
        Command::Serve { .. } => {
            let state = AppState::from_config(&config)?;
            let address = config.bind_address();
            let listener = tokio::net::TcpListener::bind(&address)
                .await
                .with_context(|| format!("Failed to bind {}", address))?;
            server::serve(listener, state).await?;
        }
        Command::Timetable { input, format } => {
            let raw = std::fs::read_to_string(input)
                .with_context(|| format!("Failed to read {}", input))?;
            let request: TimetableRequest = serde_json::from_str(&raw).map_err(|e| {
                CatalystError::validation(format!("Invalid timetable request in {}: {}", input, e))
            })?;
            let plan = timetable::generate(&request, config.timetable_defaults())?;
            print_plan(&plan, &request, *format)?;
        }
        Command::Ask { message } => {
            let chat = ChatClient::from_settings(config.llm())?;
            let mentor = MentorChat::new(chat, config.llm());
            let reply = mentor
                .handle(MentorChatRequest {
                    message: message.join(" "),
                })
                .await?;
            tracing::debug!("Answered by {}", reply.source);
            println!("{}", reply.response);
        }
    }
    Ok(())
}

fn print_plan(
    plan: &TimetablePlan,
    request: &TimetableRequest,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let body = json!({
                "schedule": plan.schedule(),
                "type": plan.plan_type,
                "totalHours": request.total_hours,
                "message": plan.summary_message(request.total_hours),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Csv => plan.write_csv(std::io::stdout().lock())?,
        OutputFormat::Table => {
            println!("📅 {}", plan.summary_message(request.total_hours));
            for slot in &plan.slots {
                println!(
                    "{:<12} {:>4} min  {:<8} {}",
                    slot_key(slot.start_minute),
                    slot.duration,
                    slot.kind.as_str(),
                    slot.title
                );
            }
        }
    }
    Ok(())
}

fn exit_with(e: &CatalystError) -> ! {
    tracing::error!(
        "❌ catalyst failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
