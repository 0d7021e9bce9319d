// ==========================================
// Exportación de conceptos - pruebas de integración
// ==========================================


use calamine::{open_workbook, Data, Reader, Xlsx};
use perseo_nominas::importer::SilentProgress;
use perseo_nominas::{
    CatalogRepository, ConceptosExporter, Estatus, ExportError, PercepcionesDeduccionesImporter,
    Settings,
};
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{create_test_db, juan_carlos, shared_connection, write_explotacion};

#[test]
fn test_export_empty_catalog_fails_without_file() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let exports_dir = TempDir::new().unwrap();
    let settings = Settings::for_paths(None, Path::new(&db_path), exports_dir.path());

    let err = ConceptosExporter::new(shared_connection(&db_path), &settings)
        .exportar()
        .unwrap_err();

    assert!(matches!(err, ExportError::EmptyResult(_)));
    assert_eq!(err.to_string(), "No hay Conceptos para exportar.");
    assert_eq!(std::fs::read_dir(exports_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_after_ingestion() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let work_dir = TempDir::new().unwrap();
    write_explotacion(work_dir.path(), "202501", &[juan_carlos()]);
    let exports_dir = work_dir.path().join("exports");
    let settings = Settings::for_paths(Some(work_dir.path()), Path::new(&db_path), &exports_dir);

    let conn = shared_connection(&db_path);
    PercepcionesDeduccionesImporter::new(conn.clone(), &settings)
        .alimentar("202501", &SilentProgress)
        .unwrap();
    CatalogRepository::from_connection(conn.clone())
        .create_concepto("P99", "BAJA", Estatus::Inactivo)
        .unwrap();

    let outcome = ConceptosExporter::new(conn, &settings).exportar().unwrap();

    assert!(outcome.message.starts_with("Se exportaron 2 Conceptos a conceptos_"));
    assert!(outcome.file_name.ends_with(".xlsx"));
    assert!(outcome.local_path.starts_with(exports_dir.join("conceptos")));
    assert_eq!(outcome.public_url, "");

    let mut workbook: Xlsx<_> = open_workbook(&outcome.local_path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["CLAVE".to_string(), "DESCRIPCION".to_string()],
            vec!["D02".to_string(), "DESCONOCIDO".to_string()],
            vec!["P01".to_string(), "DESCONOCIDO".to_string()],
        ]
    );
}
