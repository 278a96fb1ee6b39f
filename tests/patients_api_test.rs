mod common;

use poem::http::StatusCode;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::{assert_identifier_shape, bearer, seed_and_login, seed_patient, spawn_app};
use mediflow_backend::types::db::patient;
use mediflow_backend::types::internal::auth::Role;

fn patient_payload(ssn: Option<&str>) -> serde_json::Value {
    let mut payload = json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "date_of_birth": "1985-03-15",
        "gender": "FEMALE",
        "blood_group": "O_POSITIVE",
        "phone_number": "5559876543",
        "address": "123 Main Street",
        "city": "Los Angeles",
        "state": "CA",
        "zip_code": "90001",
        "emergency_contact_name": "John Doe",
        "emergency_contact_phone": "5559876544",
        "emergency_contact_relation": "Spouse",
    });
    if let Some(ssn) = ssn {
        payload["ssn"] = json!(ssn);
    }
    payload
}

#[tokio::test]
async fn listing_without_credentials_is_unauthenticated() {
    let (_ctx, cli) = spawn_app().await;

    let resp = cli.get("/api/patients").send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn receptionist_can_register_a_patient() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "reception@clinic.test", Role::Receptionist).await;

    let resp = cli
        .post("/api/patients")
        .header("authorization", bearer(&token))
        .body_json(&patient_payload(None))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let body = resp.json().await;
    let body = body.value().object();
    assert_identifier_shape(body.get("mrn").string(), "MRN");
    assert_eq!(body.get("first_name").string(), "Jane");
}

#[tokio::test]
async fn create_view_and_edit_each_produce_exactly_one_audit_entry() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;

    let resp = cli
        .post("/api/patients")
        .header("authorization", bearer(&token))
        .body_json(&patient_payload(None))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let patient_id = body.value().object().get("id").string().to_string();

    let trail = ctx
        .audit_store
        .query_by_entity("Patient", &patient_id, None, None)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "CREATE_PATIENT");

    let resp = cli
        .get(format!("/api/patients/{patient_id}"))
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .put(format!("/api/patients/{patient_id}"))
        .header("authorization", bearer(&token))
        .body_json(&json!({ "phone_number": "5550001111" }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let trail = ctx
        .audit_store
        .query_by_entity("Patient", &patient_id, None, None)
        .await
        .unwrap();
    assert_eq!(trail.len(), 3);
    // Newest first
    assert_eq!(trail[0].action, "EDIT_PATIENT");
    assert_eq!(trail[1].action, "VIEW_PATIENT");
    assert_eq!(trail[2].action, "CREATE_PATIENT");
}

#[tokio::test]
async fn ssn_is_encrypted_at_rest_and_decrypted_on_read() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;

    let resp = cli
        .post("/api/patients")
        .header("authorization", bearer(&token))
        .body_json(&patient_payload(Some("123-45-6789")))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let patient_id = body.value().object().get("id").string().to_string();

    // At rest: ciphertext, not the SSN
    let row = ctx.patient_store.find_by_id(&patient_id).await.unwrap().unwrap();
    let stored = row.ssn_encrypted.as_deref().unwrap();
    assert_ne!(stored, "123-45-6789");
    assert!(!stored.contains("6789"));

    // On read: decrypted for display
    let resp = cli
        .get(format!("/api/patients/{patient_id}"))
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    assert_eq!(body.value().object().get("ssn").string(), "123-45-6789");
}

#[tokio::test]
async fn corrupted_ssn_ciphertext_reads_as_redacted() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;
    let patient = seed_patient(&ctx, "Jane", "Doe").await;

    patient::Entity::update_many()
        .col_expr(
            patient::Column::SsnEncrypted,
            Expr::value(Some("garbage-ciphertext".to_string())),
        )
        .filter(patient::Column::Id.eq(patient.id.as_str()))
        .exec(&ctx.db)
        .await
        .unwrap();

    let resp = cli
        .get(format!("/api/patients/{}", patient.id))
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    assert_eq!(body.value().object().get("ssn").string(), "***ENCRYPTED***");
}

#[tokio::test]
async fn search_narrows_the_listing() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "nurse@clinic.test", Role::Nurse).await;
    seed_patient(&ctx, "Jane", "Doe").await;
    seed_patient(&ctx, "Robert", "Johnson").await;

    let resp = cli
        .get("/api/patients")
        .query("search", &"Johnson")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let body = body.value().object();
    assert_eq!(body.get("patients").array().len(), 1);
    assert_eq!(body.get("pagination").object().get("total").i64(), 1);
}

#[tokio::test]
async fn missing_patient_is_not_found() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;

    let resp = cli
        .get("/api/patients/no-such-id")
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivation_is_soft_and_audited() {
    let (ctx, cli) = spawn_app().await;
    let token = seed_and_login(&ctx, "admin@clinic.test", Role::Admin).await;
    let patient = seed_patient(&ctx, "Jane", "Doe").await;

    let resp = cli
        .delete(format!("/api/patients/{}", patient.id))
        .header("authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let row = ctx.patient_store.find_by_id(&patient.id).await.unwrap().unwrap();
    assert!(!row.is_active);

    let trail = ctx
        .audit_store
        .query_by_entity("Patient", &patient.id, None, None)
        .await
        .unwrap();
    assert_eq!(trail[0].action, "DELETE_PATIENT");
}

#[tokio::test]
async fn clinical_staff_document_allergies_but_receptionists_cannot() {
    let (ctx, cli) = spawn_app().await;
    let nurse = seed_and_login(&ctx, "nurse@clinic.test", Role::Nurse).await;
    let receptionist = seed_and_login(&ctx, "reception@clinic.test", Role::Receptionist).await;
    let patient = seed_patient(&ctx, "Jane", "Doe").await;

    let allergy = json!({
        "allergen": "Penicillin",
        "allergy_type": "Drug",
        "reaction": "Hives and difficulty breathing",
        "severity": "Severe",
    });

    let resp = cli
        .post(format!("/api/patients/{}/allergies", patient.id))
        .header("authorization", bearer(&receptionist))
        .body_json(&allergy)
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = cli
        .post(format!("/api/patients/{}/allergies", patient.id))
        .header("authorization", bearer(&nurse))
        .body_json(&allergy)
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let resp = cli
        .get(format!("/api/patients/{}/allergies", patient.id))
        .header("authorization", bearer(&nurse))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let body = body.value().object();
    assert_eq!(body.get("allergies").array().len(), 1);
}

#[tokio::test]
async fn medications_are_recorded_on_the_chart() {
    let (ctx, cli) = spawn_app().await;
    let doctor = seed_and_login(&ctx, "doctor@clinic.test", Role::Doctor).await;
    let patient = seed_patient(&ctx, "Robert", "Johnson").await;

    let resp = cli
        .post(format!("/api/patients/{}/medications", patient.id))
        .header("authorization", bearer(&doctor))
        .body_json(&json!({
            "medication_name": "Metformin",
            "dosage": "500mg",
            "frequency": "Twice daily",
            "route": "Oral",
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let medications = ctx
        .chart_store
        .medications_for_patient(&patient.id)
        .await
        .unwrap();
    assert_eq!(medications.len(), 1);
    assert_eq!(medications[0].medication_name, "Metformin");
}
