//! Tests for the exported FFI surface.

use nutricare_core::{
    blank_form, calculate_bmi, calculate_ideal_weight, open_store, open_store_in_memory,
    Database, FfiPatientForm, KeyValueSlot, NutriCareError, PATIENTS_KEY,
};

fn patient_form(name: &str, weight: &str, height: &str) -> FfiPatientForm {
    let mut form = blank_form();
    form.name = name.into();
    form.weight = weight.into();
    form.height = height.into();
    form.age = "30".into();
    form
}

#[test]
fn test_register_list_remove() {
    let core = open_store_in_memory().unwrap();
    assert_eq!(core.load_patients().unwrap().count, 0);

    let mut form = blank_form();
    form.name = "Márcia".into();
    form.weight = "60".into();
    form.height = "1.62".into();
    form.age = "41".into();
    form.sex = "feminino".into();

    let added = core.add_patient(form).unwrap();
    assert!(added.warning.is_none());
    assert_eq!(added.patient.sex, "female");
    assert_eq!(added.patient.bmi_value, 22.86);
    assert_eq!(added.patient.bmi_classification, "normal");
    assert_eq!(added.patient.bmi_label, "Peso normal");
    assert_eq!(added.patient.ideal_weight_kg, 56.0);

    let listed = core.list_patients().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, added.patient.id);

    let removal = core.remove_patient(added.patient.id.clone()).unwrap();
    assert!(removal.removed);
    assert!(core.list_patients().unwrap().is_empty());
}

#[test]
fn test_edit_and_update() {
    let core = open_store_in_memory().unwrap();
    let mut form = blank_form();
    form.name = "Paulo".into();
    form.weight = "90".into();
    form.height = "1.75".into();
    form.age = "52".into();
    let id = core.add_patient(form).unwrap().patient.id;

    let mut prefill = core.edit_patient(id.clone()).unwrap().unwrap();
    assert_eq!(prefill.weight, "90");
    prefill.weight = "80".into();

    let updated = core.update_patient(id.clone(), prefill).unwrap();
    assert_eq!(updated.patient.id, id);
    assert_eq!(core.list_patients().unwrap().len(), 1);

    assert!(core.edit_patient("missing".into()).unwrap().is_none());
    assert!(matches!(
        core.update_patient("missing".into(), blank_form()),
        Err(NutriCareError::NotFound(_))
    ));
}

#[test]
fn test_invalid_form() {
    let core = open_store_in_memory().unwrap();
    let result = core.add_patient(blank_form());
    assert!(matches!(result, Err(NutriCareError::InvalidInput(_))));
    assert!(core.list_patients().unwrap().is_empty());
}

#[test]
fn test_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nutricare.db").to_string_lossy().into_owned();

    let core = open_store(path.clone()).unwrap();
    let mut form = blank_form();
    form.name = "Lia".into();
    form.weight = "50".into();
    form.height = "1.58".into();
    form.age = "19".into();
    form.sex = "female".into();
    core.add_patient(form).unwrap();
    drop(core);

    let core = open_store(path).unwrap();
    let report = core.load_patients().unwrap();
    assert_eq!(report.count, 1);
    assert!(report.warning.is_none());

    let id = core.list_patients().unwrap()[0].id.clone();
    let patient = core.get_patient(id).unwrap().unwrap();
    assert_eq!(patient.name, "Lia");
    assert_eq!(patient.age, "19");
    assert_eq!(patient.age_years, Some(19));
}

#[test]
fn test_reopened_store_keeps_existing_patients() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nutricare.db").to_string_lossy().into_owned();

    let core = open_store(path.clone()).unwrap();
    core.add_patient(patient_form("Ana", "58", "1.65")).unwrap();
    core.add_patient(patient_form("Beto", "80", "1.80")).unwrap();
    drop(core);

    // Register straight away, without calling load_patients first
    let core = open_store(path.clone()).unwrap();
    let report = core.last_load_report().unwrap();
    assert_eq!(report.count, 2);
    assert!(report.warning.is_none());
    core.add_patient(patient_form("Caio", "75", "1.75")).unwrap();
    drop(core);

    let core = open_store(path).unwrap();
    let names: Vec<_> = core
        .list_patients()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Ana", "Beto", "Caio"]);
}

#[test]
fn test_corrupt_file_reported_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nutricare.db");
    Database::open(&path)
        .unwrap()
        .set(PATIENTS_KEY, "not json")
        .unwrap();

    let core = open_store(path.to_string_lossy().into_owned()).unwrap();
    let report = core.last_load_report().unwrap();
    assert_eq!(report.count, 0);
    assert!(report.warning.is_some());
}

#[test]
fn test_save_patients() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nutricare.db").to_string_lossy().into_owned();

    let core = open_store(path.clone()).unwrap();
    core.add_patient(patient_form("Ana", "58", "1.65")).unwrap();
    core.save_patients().unwrap();
    drop(core);

    let core = open_store(path).unwrap();
    assert_eq!(core.list_patients().unwrap().len(), 1);
}

#[test]
fn test_calculators() {
    let bmi = calculate_bmi(70.0, 1.75).unwrap();
    assert_eq!(bmi.value, 22.86);
    assert_eq!(bmi.classification, "normal");

    assert!(matches!(
        calculate_bmi(70.0, 0.0),
        Err(NutriCareError::InvalidInput(_))
    ));

    assert_eq!(calculate_ideal_weight(1.70, "male".into()).unwrap(), 65.0);
    assert_eq!(calculate_ideal_weight(1.70, "Feminino".into()).unwrap(), 60.0);
    assert!(calculate_ideal_weight(1.70, "?".into()).is_err());
}
