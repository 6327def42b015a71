#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use anyhow::Context;
use iacdash::app::paths;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "iacdash=info,eframe=info,egui=warn,wgpu=warn,winit=warn,hyper=warn,reqwest=warn";

fn init_logging() -> anyhow::Result<std::path::PathBuf> {
    let log_dir = paths::log_dir().context("No data directory for logs")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;
    let log_path = log_dir.join("iacdash.log");

    let file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;

    // Owner read/write only; the log can carry repository names
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&log_path, perms) {
                eprintln!("Failed to set log file permissions: {}", e);
            }
        }
    }

    // RUST_LOG wins over the built-in filter
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => tracing_subscriber::EnvFilter::builder().parse(spec),
        _ => tracing_subscriber::EnvFilter::builder().parse(DEFAULT_FILTER),
    }
    .context("Failed to parse log filter")?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(move || {
                file.try_clone()
                    .map(|f| Box::new(f) as Box<dyn std::io::Write>)
                    .unwrap_or_else(|_| Box::new(std::io::sink()))
            })
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // eframe and egui log through the `log` crate
    tracing_log::LogTracer::init().context("Failed to initialize log-to-tracing bridge")?;

    Ok(log_path)
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let crash_msg = format!(
            "IaC Dash crashed!\n\
             Panic occurred at: {}\n\
             Details: {}\n\
             Backtrace:\n{:?}\n",
            panic_info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string()),
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic"),
            std::backtrace::Backtrace::force_capture()
        );

        if let Some(log_dir) = paths::log_dir() {
            let _ = std::fs::create_dir_all(&log_dir);
            let crash_log_path = log_dir.join("crash.log");

            if let Ok(mut file) = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&crash_log_path)
            {
                use std::io::Write;
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "\n=== CRASH at {} ===\n{}", timestamp, crash_msg);
            }

            eprintln!("\n{}", crash_msg);
            eprintln!("Crash log written to: {:?}", crash_log_path);
        } else {
            eprintln!("\n{}", crash_msg);
        }
    }));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before anything else so early crashes are captured
    setup_panic_handler();

    match init_logging() {
        Ok(log_path) => tracing::info!("Logging initialized to: {:?}", log_path),
        Err(e) => eprintln!("File logging disabled: {:#}", e),
    }
    tracing::info!(
        "iacdash {} ({}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT")
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("IaC Dash")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "IaC Dash",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(iacdash::DashApp::new(cc)))
        }),
    )?;

    tracing::info!("iacdash exited");
    Ok(())
}
