// ==========================================
// Perseo nómina - Línea de comandos
// ==========================================
// perseo alimentar <quincena>   percepciones-deducciones desde NominaFmt2.XLS
// perseo exportar               conceptos activos a XLSX
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use perseo_nominas::db::open_sqlite_connection;
use perseo_nominas::i18n::{set_locale, t, t_with_args};
use perseo_nominas::importer::{preparar_alimentacion, AlimentacionPreparada, StdoutProgress};
use perseo_nominas::storage::GcsStorage;
use perseo_nominas::{
    logging, ConceptosExporter, PercepcionesDeduccionesImporter, Settings,
};
use rusqlite::Connection;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Perseo - percepciones-deducciones y catálogos de nómina
#[derive(Parser, Debug)]
#[command(name = "perseo")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Alimentar percepciones-deducciones de una quincena
    Alimentar {
        /// Quincena de seis dígitos, por ejemplo 202501
        quincena: String,
    },

    /// Exportar Conceptos a un archivo XLSX
    Exportar,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    set_locale(&settings.locale);
    logging::init();

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format!("{e:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::Alimentar { quincena } => {
            // Quincena y archivo se validan antes de abrir la base de datos
            let preparada = match preparar_alimentacion(
                settings.explotacion_base_dir.as_deref(),
                &quincena,
                &StdoutProgress,
            ) {
                Ok(preparada) => preparada,
                // El aviso ya se imprimió
                Err(e) if e.is_precondition() => return Ok(ExitCode::SUCCESS),
                Err(e) => return Err(e.into()),
            };
            let conn = open_database(settings)?;
            Ok(alimentar(conn, settings, &preparada))
        }
        Commands::Exportar => {
            let conn = open_database(settings)?;
            Ok(exportar(conn, settings))
        }
    }
}

fn open_database(settings: &Settings) -> Result<Arc<Mutex<Connection>>> {
    let path = &settings.database_path;
    let path_text = path.display().to_string();
    let context = |error: String| {
        t_with_args("cli.database_error", &[("path", &path_text), ("error", &error)])
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| context(parent.display().to_string()))?;
    }
    let conn = open_sqlite_connection(&path_text).with_context(|| context("SQLite".to_string()))?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn alimentar(
    conn: Arc<Mutex<Connection>>,
    settings: &Settings,
    preparada: &AlimentacionPreparada,
) -> ExitCode {
    let importer = PercepcionesDeduccionesImporter::new(conn, settings);
    match importer.alimentar_preparada(preparada, &StdoutProgress) {
        Ok(report) => {
            if report.rows_skipped > 0 {
                let count = report.rows_skipped.to_string();
                println!("{}", t_with_args("cli.skipped_rows", &[("count", &count)]).yellow());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error = e.to_string();
            eprintln!("{}", t_with_args("cli.import_aborted", &[("error", &error)]).red());
            ExitCode::FAILURE
        }
    }
}

fn exportar(conn: Arc<Mutex<Connection>>, settings: &Settings) -> ExitCode {
    let mut exporter = ConceptosExporter::new(conn, settings);
    if settings.cloud_storage_deposito.is_some() {
        match GcsStorage::new(settings.cloud_storage_token.clone()) {
            Ok(storage) => exporter = exporter.with_storage(Box::new(storage)),
            Err(e) => {
                let error = e.to_string();
                warn!("{}", t_with_args("cli.storage_client_error", &[("error", &error)]));
            }
        }
    } else {
        info!("{}", t("cli.storage_not_configured"));
    }

    match exporter.exportar() {
        Ok(outcome) => {
            println!("{}", outcome.message.green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
