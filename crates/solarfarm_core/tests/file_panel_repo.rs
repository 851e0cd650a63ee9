use solarfarm_core::{
    FilePanelRepository, FixedClock, Material, PanelRepository, PanelService, SolarPanel,
    StorageError,
};

fn sample_panels() -> Vec<SolarPanel> {
    vec![
        SolarPanel::new("Main", 1, 1, 2018, Material::PolySi, true),
        SolarPanel::new("Main", 1, 2, 2019, Material::MonoSi, false),
        SolarPanel::new("Flats", 12, 40, 2021, Material::ASi, true),
        SolarPanel::new("Upper Hill", 249, 249, 1999, Material::CdTe, false),
        SolarPanel::new("Upper Hill", 3, 7, 2024, Material::Cigs, true),
    ]
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("absent.txt"));

    assert!(repo.find_all().unwrap().is_empty());
    assert!(repo.find_by_id(1).unwrap().is_none());
    assert!(!repo.update(&SolarPanel::with_id(1, "A", 1, 1, 2020, Material::Cigs, true)).unwrap());
    assert!(!repo.delete_by_id(1).unwrap());
    assert!(!repo.path().exists());
}

#[test]
fn written_panels_read_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));

    let mut created: Vec<SolarPanel> = sample_panels()
        .iter()
        .map(|panel| repo.create(panel).unwrap())
        .collect();
    assert_eq!(
        created.iter().map(|panel| panel.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );

    let reopened = FilePanelRepository::new(repo.path());
    let mut loaded = reopened.find_all().unwrap();
    created.sort_by_key(|panel| panel.id);
    loaded.sort_by_key(|panel| panel.id);
    assert_eq!(loaded, created);
}

#[test]
fn find_all_is_sorted_by_section_row_column() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));
    for panel in sample_panels() {
        repo.create(&panel).unwrap();
    }

    let keys: Vec<(String, i32, i32)> = repo
        .find_all()
        .unwrap()
        .iter()
        .map(|panel| (panel.section_str().to_string(), panel.row, panel.column))
        .collect();
    assert_eq!(keys[0], ("Flats".to_string(), 12, 40));
    assert_eq!(keys[1], ("Main".to_string(), 1, 1));
    assert_eq!(keys[3], ("Upper Hill".to_string(), 3, 7));
    assert_eq!(keys[4], ("Upper Hill".to_string(), 249, 249));
}

#[test]
fn find_by_section_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));
    for panel in sample_panels() {
        repo.create(&panel).unwrap();
    }

    let found = repo.find_by_section("upper HILL").unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|panel| panel.section_str() == "Upper Hill"));
}

#[test]
fn section_delimiters_are_stripped_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));

    let created = repo
        .create(&SolarPanel::new("East~Wing\r\n", 1, 1, 2020, Material::Cigs, false))
        .unwrap();

    let loaded = repo.find_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.section_str(), "EastWing");
    assert_eq!(std::fs::read_to_string(repo.path()).unwrap().lines().count(), 1);
}

#[test]
fn stripped_sections_can_collide_on_natural_key() {
    let dir = tempfile::tempdir().unwrap();
    let service = PanelService::with_clock(
        FilePanelRepository::new(dir.path().join("panels.txt")),
        FixedClock(2024),
    );

    for section in ["AB", "A~B"] {
        let result = service
            .create(Some(SolarPanel::new(section, 1, 1, 2020, Material::Cigs, false)))
            .unwrap();
        assert!(result.is_success(), "{section}: {:?}", result.errors());
    }

    let keys: Vec<_> = service
        .find_all()
        .unwrap()
        .into_iter()
        .map(|panel| (panel.id, panel.section_str().to_string(), panel.row, panel.column))
        .collect();
    assert_eq!(
        keys,
        vec![(1, "AB".to_string(), 1, 1), (2, "AB".to_string(), 1, 1)]
    );
}

#[test]
fn create_fails_cleanly_when_id_space_is_exhausted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.txt");
    let full = format!("{}~Main~1~1~2020~CIGS~true\n", i64::MAX);
    std::fs::write(&path, &full).unwrap();
    let repo = FilePanelRepository::new(&path);

    let err = repo
        .create(&SolarPanel::new("Main", 1, 2, 2020, Material::Cigs, true))
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(message) if message.contains("exhausted")));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), full);
}

#[test]
fn update_and_delete_target_ids() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));
    let first = repo.create(&sample_panels()[0]).unwrap();
    let second = repo.create(&sample_panels()[1]).unwrap();

    let mut moved = first.clone();
    moved.section = Some("Annex".to_string());
    moved.column = 99;
    assert!(repo.update(&moved).unwrap());
    assert_eq!(repo.find_by_id(first.id).unwrap().unwrap(), moved);

    assert!(repo.delete_by_id(second.id).unwrap());
    assert!(!repo.delete_by_id(second.id).unwrap());

    let next = repo.create(&sample_panels()[2]).unwrap();
    assert_eq!(next.id, 2);
}

#[test]
fn malformed_lines_are_skipped_and_bad_values_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panels.txt");
    std::fs::write(&path, "1~Main~1~1~2020~POLY_SI~true\nnot a panel\n\n2~Main~1~2\n").unwrap();
    let repo = FilePanelRepository::new(&path);

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 1);

    std::fs::write(&path, "1~Main~one~1~2020~POLY_SI~true\n").unwrap();
    assert!(matches!(
        repo.find_all().unwrap_err(),
        StorageError::InvalidData(_)
    ));
}

#[test]
fn unreadable_path_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path());

    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
}

#[test]
fn service_over_file_storage_creates_and_rejects_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePanelRepository::new(dir.path().join("panels.txt"));
    let service = PanelService::with_clock(&repo, FixedClock(2024));

    let created = service.create(Some(sample_panels()[0].clone())).unwrap();
    assert!(created.is_success());
    let id = created.panel().unwrap().id;

    let duplicate = service.create(Some(sample_panels()[0].clone())).unwrap();
    assert!(!duplicate.is_success());

    let deleted = service.delete_by_id(id).unwrap();
    assert!(deleted.is_success());
    assert!(repo.find_all().unwrap().is_empty());
}
