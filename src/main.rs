use room_insight::{
    AnalysisRequest, AnalysisResult, AnalysisService, AppError, Configuration, EnhancementInput,
    RoomAnalyzer,
};
use std::{
    env,
    path::{Path, PathBuf},
    process,
    sync::Arc,
    time::Duration,
};
use tower::{BoxError, ServiceBuilder, ServiceExt};
use tracing::{error, info, Level};

struct CliArgs {
    config_path: Option<PathBuf>,
    room_type: String,
    notes: String,
    enhancement_path: Option<PathBuf>,
    images: Vec<PathBuf>,
}

fn print_help(program: &str) {
    eprintln!("Usage: {} [OPTIONS] IMAGE...", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE          configuration file (TOML/JSON)");
    eprintln!("  --room-type TYPE       bedroom, living_room, kitchen, dining_room or other");
    eprintln!("  --notes TEXT           free-text improvement notes");
    eprintln!("  --enhancement FILE     JSON output of the object-detection service");
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        config_path: None,
        room_type: "other".to_string(),
        notes: String::new(),
        enhancement_path: None,
        images: Vec::new(),
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(value(arg.as_str())?)),
            "--room-type" => parsed.room_type = value(arg.as_str())?,
            "--notes" => parsed.notes = value(arg.as_str())?,
            "--enhancement" => parsed.enhancement_path = Some(PathBuf::from(value(arg.as_str())?)),
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            image => parsed.images.push(PathBuf::from(image)),
        }
    }

    if parsed.images.is_empty() {
        return Err("no images given".to_string());
    }
    Ok(parsed)
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_enhancement(path: &Path) -> Result<EnhancementInput, AppError> {
    let json = std::fs::read_to_string(path)?;
    Ok(EnhancementInput::from_json(&json)?)
}

fn into_app_error(err: BoxError, timeout_ms: u64) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return AppError::Timeout(timeout_ms);
    }
    match err.downcast::<AppError>() {
        Ok(app_error) => *app_error,
        Err(other) => AppError::Worker(other.to_string()),
    }
}

async fn run(args: CliArgs) -> Result<(), AppError> {
    let configuration = Configuration::load(args.config_path.as_deref())?;
    init_logging(configuration.max_log_level()?);

    let enhancement = args
        .enhancement_path
        .as_deref()
        .map(load_enhancement)
        .transpose()?;

    let analyzer = Arc::new(RoomAnalyzer::new(configuration.analyzer.clone())?);
    let timeout_ms = configuration.request_timeout_ms;
    let service = ServiceBuilder::new()
        .concurrency_limit(configuration.worker_concurrency)
        .timeout(Duration::from_millis(timeout_ms))
        .service(AnalysisService::new(analyzer));

    info!(
        "Analyzing {} image(s) as '{}' with {} workers",
        args.images.len(),
        args.room_type,
        configuration.worker_concurrency
    );

    let mut calls = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let bytes = std::fs::read(path)?;
        let request = AnalysisRequest::new(args.room_type.as_str(), args.notes.as_str(), bytes)
            .with_file_name(path.to_string_lossy())
            .with_enhancement(enhancement.clone());
        calls.push(service.clone().oneshot(request));
    }

    let results: Vec<Result<AnalysisResult, BoxError>> = futures::future::join_all(calls).await;

    let mut failures = 0;
    for (path, result) in args.images.iter().zip(results) {
        match result {
            Ok(analysis) => println!("{}", analysis.to_json_pretty()?),
            Err(e) => {
                failures += 1;
                error!(
                    "{}: {}",
                    path.display(),
                    into_app_error(e, timeout_ms)
                );
            }
        }
    }

    if failures > 0 {
        return Err(AppError::Worker(format!(
            "{} of {} analyses failed",
            failures,
            args.images.len()
        )));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("room-insight");

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help(program);
            process::exit(2);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
