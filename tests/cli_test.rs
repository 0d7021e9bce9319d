// ==========================================
// Línea de comandos - pruebas de integración
// ==========================================
// Ejecuta el binario `perseo` con un entorno limpio
// ==========================================


use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use test_helpers::{juan_carlos, write_explotacion};

fn perseo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_perseo"))
}

fn run_perseo(work_dir: &Path, envs: &[(&str, &Path)], args: &[&str]) -> Output {
    let mut cmd = Command::new(perseo_bin());
    cmd.args(args)
        .env_clear()
        .current_dir(work_dir)
        .env("PERSEO_LOCALE", "es-MX");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

#[test]
fn test_invalid_quincena_exits_before_opening_database() {
    let work_dir = TempDir::new().unwrap();
    // El padre de la base de datos es un archivo: no se puede crear
    let blocker = work_dir.path().join("bloqueo");
    std::fs::write(&blocker, b"").unwrap();
    let db_path = blocker.join("perseo.db");

    let output = run_perseo(
        work_dir.path(),
        &[
            ("PERSEO_DATABASE_PATH", &db_path),
            ("EXPLOTACION_BASE_DIR", work_dir.path()),
        ],
        &["alimentar", "12345"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Quincena inválida"));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("base de datos"));
}

#[test]
fn test_failed_preconditions_leave_no_database_file() {
    let work_dir = TempDir::new().unwrap();
    let db_path = work_dir.path().join("datos").join("perseo.db");

    let output = run_perseo(
        work_dir.path(),
        &[
            ("PERSEO_DATABASE_PATH", &db_path),
            ("EXPLOTACION_BASE_DIR", work_dir.path()),
        ],
        &["alimentar", "ab1234"],
    );
    assert!(output.status.success());
    assert!(!db_path.exists());

    let output = run_perseo(
        work_dir.path(),
        &[
            ("PERSEO_DATABASE_PATH", &db_path),
            ("EXPLOTACION_BASE_DIR", work_dir.path()),
        ],
        &["alimentar", "202501"],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("AVISO: "));
    assert!(!db_path.exists());
}

#[test]
fn test_alimentar_creates_database_after_preconditions_pass() {
    let work_dir = TempDir::new().unwrap();
    let base_dir = work_dir.path().join("explotacion");
    write_explotacion(&base_dir, "202501", &[juan_carlos()]);
    let db_path = work_dir.path().join("datos").join("perseo.db");

    let output = run_perseo(
        work_dir.path(),
        &[
            ("PERSEO_DATABASE_PATH", &db_path),
            ("EXPLOTACION_BASE_DIR", &base_dir),
        ],
        &["alimentar", "202501"],
    );

    assert!(output.status.success());
    assert!(db_path.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Terminado con 2 percepciones-deducciones alimentados."));
}
