// ==========================================
// Alimentación de percepciones-deducciones - pruebas de integración
// ==========================================
// Flujo completo: NominaFmt2.XLS en disco → SQLite en archivo temporal
// ==========================================


use perseo_nominas::importer::{CollectingProgress, ImportError};
use perseo_nominas::{
    logging, CatalogRepository, Estatus, PercepcionesDeduccionesImporter, RepositoryError,
    Settings,
};
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{
    count_all_rows, count_rows, create_test_db, juan_carlos, shared_connection,
    write_explotacion, NominaRow,
};

fn settings_for(base_dir: &Path, db_path: &str) -> Settings {
    Settings::for_paths(Some(base_dir), Path::new(db_path), &base_dir.join("exports"))
}

#[test]
fn test_reference_scenario() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    write_explotacion(base_dir.path(), "202501", &[juan_carlos()]);

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let progress = CollectingProgress::new();

    let report = importer.alimentar("202501", &progress).unwrap();

    assert_eq!(report.facts_created, 2);
    assert_eq!(report.rows_read, 1);
    assert_eq!(report.rows_skipped, 0);
    assert_eq!(report.new_conceptos, vec!["P01", "D02"]);

    assert_eq!(
        progress.lines(),
        vec![
            "Alimentando percepciones-deducciones...",
            "  Concepto P01 insertado",
            "  Centro de Trabajo CT1 insertado",
            "  Persona ABCD800101AB1 insertada",
            "  Plaza PL1 insertada",
            "  Concepto D02 insertado",
            "  Conceptos no existentes: P01,D02",
            "Terminado con 2 percepciones-deducciones alimentados.",
        ]
    );

    let repo = CatalogRepository::from_connection(conn.clone());
    let p01 = repo.find_concepto_by_clave("P01").unwrap().unwrap();
    assert_eq!(p01.descripcion, "DESCONOCIDO");
    assert!(repo.find_concepto_by_clave("D02").unwrap().is_some());
    assert_eq!(
        repo.find_centro_trabajo_by_clave("CT1").unwrap().unwrap().descripcion,
        "ND"
    );
    assert_eq!(repo.find_plaza_by_clave("PL1").unwrap().unwrap().descripcion, "ND");

    let persona = repo.find_persona_by_rfc("ABCD800101AB1").unwrap().unwrap();
    assert_eq!(persona.nombres, "Juan Carlos");
    assert_eq!(persona.apellido_primero, "Perez");
    assert_eq!(persona.apellido_segundo, "Lopez");

    let registros = repo.list_percepciones_deducciones("202501").unwrap();
    let importes: Vec<f64> = registros.iter().map(|r| r.importe).collect();
    assert_eq!(importes, vec![1500.0, 50.0]);
    assert!(registros.iter().all(|r| r.persona_id == persona.id));
    assert_eq!(registros[0].concepto_id, p01.id);

    assert_eq!(count_rows(&conn, "conceptos"), 2);
    assert_eq!(count_rows(&conn, "centros_trabajos"), 1);
    assert_eq!(count_rows(&conn, "personas"), 1);
    assert_eq!(count_rows(&conn, "plazas"), 1);

    let batches = repo.list_batches_by_quincena("202501").unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].batch_id, report.batch_id);
    assert_eq!(batches[0].facts_created, 2);
    assert_eq!(batches[0].new_conceptos, vec!["P01", "D02"]);
}

#[test]
fn test_second_run_reuses_existing_entities() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    write_explotacion(base_dir.path(), "202501", &[juan_carlos()]);

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));

    importer.alimentar("202501", &CollectingProgress::new()).unwrap();
    let progress = CollectingProgress::new();
    let report = importer.alimentar("202501", &progress).unwrap();

    assert!(report.new_conceptos.is_empty());
    assert_eq!(
        progress.lines(),
        vec![
            "Alimentando percepciones-deducciones...",
            "Terminado con 2 percepciones-deducciones alimentados.",
        ]
    );
    assert_eq!(count_rows(&conn, "conceptos"), 2);
    assert_eq!(count_rows(&conn, "personas"), 1);
    assert_eq!(count_rows(&conn, "percepciones_deducciones"), 4);
    assert_eq!(count_rows(&conn, "ingestion_batches"), 2);
}

#[test]
fn test_known_concepto_is_not_reported() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    write_explotacion(base_dir.path(), "202502", &[juan_carlos()]);

    let conn = shared_connection(&db_path);
    let repo = CatalogRepository::from_connection(conn.clone());
    repo.create_concepto("P01", "SUELDO BASE", Estatus::Activo).unwrap();

    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let report = importer
        .alimentar("202502", &CollectingProgress::new())
        .unwrap();

    assert_eq!(report.new_conceptos, vec!["D02"]);
    assert_eq!(
        repo.find_concepto_by_clave("P01").unwrap().unwrap().descripcion,
        "SUELDO BASE"
    );
}

#[test]
fn test_shared_entities_across_rows_are_created_once() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    let otra = NominaRow::new("CT1", "WXYZ900202CD2", "Garcia Ruiz Ana", "PL2")
        .bloque("P", "01", 99999)
        .bloque("P", "07", 1234);
    write_explotacion(base_dir.path(), "202503", &[juan_carlos(), otra]);

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let progress = CollectingProgress::new();
    let report = importer.alimentar("202503", &progress).unwrap();

    assert_eq!(report.facts_created, 4);
    assert_eq!(report.new_conceptos, vec!["P01", "D02", "P07"]);
    assert_eq!(count_rows(&conn, "centros_trabajos"), 1);
    assert_eq!(count_rows(&conn, "personas"), 2);
    assert_eq!(count_rows(&conn, "plazas"), 2);
    let ct_lines = progress
        .lines()
        .iter()
        .filter(|line| line.contains("Centro de Trabajo CT1"))
        .count();
    assert_eq!(ct_lines, 1);

    let repo = CatalogRepository::from_connection(conn);
    let importes: Vec<f64> = repo
        .list_percepciones_deducciones("202503")
        .unwrap()
        .iter()
        .map(|r| r.importe)
        .collect();
    assert_eq!(importes, vec![1500.0, 50.0, 999.99, 12.34]);
}

#[test]
fn test_malformed_row_is_skipped() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    let mal = NominaRow::new("CT9", "MALO800101AB1", "Solo", "PL9").bloque("P", "05", 100);
    write_explotacion(base_dir.path(), "202504", &[mal, juan_carlos()]);

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let report = importer
        .alimentar("202504", &CollectingProgress::new())
        .unwrap();

    assert_eq!(report.rows_read, 2);
    assert_eq!(report.rows_skipped, 1);
    assert_eq!(report.facts_created, 2);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].contains("Renglón 1"));

    let repo = CatalogRepository::from_connection(conn);
    assert!(repo.find_concepto_by_clave("P05").unwrap().is_none());
    assert!(repo.find_persona_by_rfc("MALO800101AB1").unwrap().is_none());
}

#[test]
fn test_store_error_mid_batch_rolls_back_everything() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    let segundo = NominaRow::new("CT2", "WXYZ800101AB1", "Ruiz Diaz Ana", "PLX").bloque("P", "03", 700);
    write_explotacion(base_dir.path(), "202505", &[juan_carlos(), segundo]);

    let conn = shared_connection(&db_path);
    conn.lock()
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER plaza_rechazada BEFORE INSERT ON plazas
             WHEN NEW.clave = 'PLX'
             BEGIN SELECT RAISE(ABORT, 'plaza rechazada'); END;",
        )
        .unwrap();

    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let progress = CollectingProgress::new();
    let err = importer.alimentar("202505", &progress).unwrap_err();

    assert!(matches!(
        err,
        ImportError::Repository(RepositoryError::DatabaseQueryError(ref msg)) if msg.contains("plaza rechazada")
    ));
    // El primer renglón alcanzó a insertar, pero nada quedó confirmado
    assert!(progress.lines().iter().any(|l| l == "  Concepto P01 insertado"));
    assert_eq!(count_all_rows(&conn), 0);
    assert!(!progress.lines().iter().any(|l| l.starts_with("Terminado con")));
}

#[test]
fn test_invalid_quincena_changes_nothing() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    write_explotacion(base_dir.path(), "202501", &[juan_carlos()]);

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));

    for quincena in ["12345", "ab1234"] {
        let progress = CollectingProgress::new();
        let err = importer.alimentar(quincena, &progress).unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(progress.lines(), vec!["Quincena inválida"]);
    }
    assert_eq!(count_all_rows(&conn), 0);
}

#[test]
fn test_unreadable_file_changes_nothing() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let base_dir = TempDir::new().unwrap();
    let dir = base_dir.path().join("202505");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("NominaFmt2.XLS"), b"no es una hoja").unwrap();

    let conn = shared_connection(&db_path);
    let importer =
        PercepcionesDeduccionesImporter::new(conn.clone(), &settings_for(base_dir.path(), &db_path));
    let err = importer
        .alimentar("202505", &CollectingProgress::new())
        .unwrap_err();

    assert!(matches!(err, ImportError::SpreadsheetOpen { .. }));
    assert_eq!(count_all_rows(&conn), 0);
}
