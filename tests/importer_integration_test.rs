// ==========================================
// ReferenceImporter 集成测试
// ==========================================
// 测试目标: 验证 Excel / CSV 导入源到 SQLite 的完整导入流程
// ==========================================


use airport_lookup_api::domain::ImportOutcome;
use airport_lookup_api::importer::{ImportError, ReferenceImporter, ReferenceImporterImpl};
use airport_lookup_api::logging;
use airport_lookup_api::repository::{
    AirportLookupRepository, AirportRepository, ReferenceDataRepositoryImpl,
};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use test_helpers::{count_rows, create_test_store, fixture_path, write_csv_source};

fn imported(outcome: ImportOutcome) -> airport_lookup_api::ImportSummary {
    match outcome {
        ImportOutcome::Imported(summary) => summary,
        other => panic!("expected an import, got {:?}", other),
    }
}

#[tokio::test]
async fn test_import_excel_workbook() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store.clone()),
        fixture_path("reference_data.xlsx"),
    );

    let summary = imported(importer.import().await.unwrap());
    assert_eq!(summary.countries, 2);
    assert_eq!(summary.cities, 3);
    assert_eq!(summary.airports, 3);
    assert_eq!(summary.skipped_rows, 1);

    assert_eq!(count_rows(&store, "country").unwrap(), 2);
    assert_eq!(count_rows(&store, "city").unwrap(), 3);
    assert_eq!(count_rows(&store, "airport").unwrap(), 3);

    let repo = AirportRepository::new(store.clone());

    // 数值序列号与文本日期均解析为 2024-01-01
    let del = repo.find_by_iata_code("DEL").unwrap().unwrap();
    let jan_first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(del.airport.created_at, Some(jan_first));
    assert_eq!(del.airport.updated_at, Some(jan_first));
    assert_eq!(del.airport.elevation_ft, Some(777));
    assert!(del.city.as_ref().unwrap().is_active);
    assert_eq!(del.country.as_ref().unwrap().alt_name.as_deref(), Some("Bharat"));

    // 文本坐标被解析，空日期取导入时间
    let hnd = repo.find_by_iata_code("HND").unwrap().unwrap();
    assert_eq!(hnd.airport.latitude_deg, Some(35.5523));
    assert_eq!(hnd.airport.longitude_deg, Some(139.7798));
    assert!(hnd.airport.created_at.is_some());
    assert!(hnd.city.as_ref().unwrap().is_active);

    // 0 值数值字段为 null，悬空引用不报错
    let xxz = repo.find_by_iata_code("XXZ").unwrap().unwrap();
    assert_eq!(xxz.airport.elevation_ft, None);
    assert_eq!(xxz.airport.latitude_deg, None);
    assert!(xxz.city.is_none());
    assert!(xxz.country.is_none());

    // "yes" 不是合法的启用标记
    let conn = store.lock().unwrap();
    let ghost_active: bool = conn
        .query_row("SELECT is_active FROM city WHERE id = 30", [], |r| r.get(0))
        .unwrap();
    assert!(!ghost_active);
}

#[tokio::test]
async fn test_import_csv_directory() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let dir = TempDir::new().unwrap();
    write_csv_source(dir.path()).unwrap();

    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store.clone()),
        dir.path(),
    );
    let summary = imported(importer.import().await.unwrap());
    assert_eq!((summary.countries, summary.cities, summary.airports), (2, 2, 2));
    assert_eq!(summary.skipped_rows, 1);

    let repo = AirportRepository::new(store);
    let del = repo.find_by_iata_code("DEL").unwrap().unwrap();
    assert_eq!(del.airport.city_id, Some(10));
    assert_eq!(del.airport.wikipedia_link, None);
    assert_eq!(del.country.unwrap().mobile_code, Some(91));
}

#[tokio::test]
async fn test_second_import_performs_no_writes() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let dir = TempDir::new().unwrap();
    write_csv_source(dir.path()).unwrap();

    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store.clone()),
        dir.path(),
    );
    imported(importer.import().await.unwrap());

    // 修改导入源：若再次写入，城市名会被覆盖
    std::fs::write(
        dir.path().join("cities.csv"),
        "id,name,country_id,is_active,lat,long\n10,Renamed,1,true,,\n",
    )
    .unwrap();

    let outcome = importer.import().await.unwrap();
    assert_eq!(outcome, ImportOutcome::Skipped { existing_countries: 2 });

    let conn = store.lock().unwrap();
    let name: String = conn
        .query_row("SELECT name FROM city WHERE id = 10", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "New Delhi");
}

#[tokio::test]
async fn test_reimport_upserts_by_business_id() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store.clone()),
        fixture_path("reference_data.xlsx"),
    );
    imported(importer.import().await.unwrap());

    // 清空国家表以解除门控，城市与机场保留
    store.lock().unwrap().execute("DELETE FROM country", []).unwrap();

    imported(importer.import().await.unwrap());
    assert_eq!(count_rows(&store, "country").unwrap(), 2);
    assert_eq!(count_rows(&store, "city").unwrap(), 3);
    assert_eq!(count_rows(&store, "airport").unwrap(), 3);
}

#[tokio::test]
async fn test_missing_sheet_is_fatal() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store.clone()),
        fixture_path("missing_cities.xlsx"),
    );

    let err = importer.import().await.unwrap_err();
    assert!(err.is_fatal());
    match err {
        ImportError::SheetMissing { missing, .. } => assert_eq!(missing, vec!["cities"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(count_rows(&store, "country").unwrap(), 0);
}

#[tokio::test]
async fn test_missing_source_file_is_not_fatal() {
    logging::init_test();
    let (_tmp, store) = create_test_store().unwrap();
    let dir = TempDir::new().unwrap();
    let importer = ReferenceImporterImpl::with_defaults(
        ReferenceDataRepositoryImpl::new(store),
        dir.path().join("Database.xlsx"),
    );

    let err = importer.import().await.unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
    assert!(!err.is_fatal());
}
