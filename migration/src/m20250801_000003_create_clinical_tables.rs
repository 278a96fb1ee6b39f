use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Patients. Mrn carries a unique constraint; creation retries with a
        // fresh suffix on conflict.
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Patients::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Patients::Mrn).string().not_null().unique_key())
                    .col(ColumnDef::new(Patients::FirstName).string().not_null())
                    .col(ColumnDef::new(Patients::LastName).string().not_null())
                    .col(ColumnDef::new(Patients::MiddleName).string())
                    .col(ColumnDef::new(Patients::DateOfBirth).string().not_null())
                    .col(ColumnDef::new(Patients::Gender).string().not_null())
                    .col(ColumnDef::new(Patients::BloodGroup).string())
                    .col(ColumnDef::new(Patients::Email).string())
                    .col(ColumnDef::new(Patients::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Patients::Address).string().not_null())
                    .col(ColumnDef::new(Patients::City).string().not_null())
                    .col(ColumnDef::new(Patients::State).string().not_null())
                    .col(ColumnDef::new(Patients::ZipCode).string().not_null())
                    .col(ColumnDef::new(Patients::Country).string().not_null())
                    .col(ColumnDef::new(Patients::EmergencyContactName).string().not_null())
                    .col(ColumnDef::new(Patients::EmergencyContactPhone).string().not_null())
                    .col(ColumnDef::new(Patients::EmergencyContactRelation).string().not_null())
                    .col(ColumnDef::new(Patients::InsuranceProvider).string())
                    .col(ColumnDef::new(Patients::InsurancePolicyNumber).string())
                    .col(ColumnDef::new(Patients::PreferredLanguage).string())
                    .col(ColumnDef::new(Patients::SsnEncrypted).string())
                    .col(ColumnDef::new(Patients::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Patients::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Patients::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patients_last_name")
                    .table(Patients::Table)
                    .col(Patients::LastName)
                    .to_owned(),
            )
            .await?;

        // Providers
        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Providers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Providers::UserId).string().not_null())
                    .col(ColumnDef::new(Providers::FirstName).string().not_null())
                    .col(ColumnDef::new(Providers::LastName).string().not_null())
                    .col(ColumnDef::new(Providers::NpiNumber).string().not_null())
                    .col(ColumnDef::new(Providers::Specialty).string().not_null())
                    .col(ColumnDef::new(Providers::LicenseNumber).string())
                    .col(ColumnDef::new(Providers::PhoneNumber).string())
                    .col(
                        ColumnDef::new(Providers::AcceptingNewPatients)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Providers::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_providers_user_id")
                            .from(Providers::Table, Providers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_providers_user_id")
                    .table(Providers::Table)
                    .col(Providers::UserId)
                    .to_owned(),
            )
            .await?;

        // Appointments
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Appointments::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Appointments::PatientId).string().not_null())
                    .col(ColumnDef::new(Appointments::ProviderId).string().not_null())
                    .col(ColumnDef::new(Appointments::ScheduledAt).big_integer().not_null())
                    .col(ColumnDef::new(Appointments::DurationMinutes).integer().not_null())
                    .col(ColumnDef::new(Appointments::AppointmentType).string().not_null())
                    .col(ColumnDef::new(Appointments::Status).string().not_null())
                    .col(ColumnDef::new(Appointments::Reason).string().not_null())
                    .col(ColumnDef::new(Appointments::Notes).string())
                    .col(ColumnDef::new(Appointments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_patient_id")
                            .from(Appointments::Table, Appointments::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_provider_id")
                            .from(Appointments::Table, Appointments::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_provider_schedule")
                    .table(Appointments::Table)
                    .col(Appointments::ProviderId)
                    .col(Appointments::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_patient_id")
                    .table(Appointments::Table)
                    .col(Appointments::PatientId)
                    .to_owned(),
            )
            .await?;

        // Prescriptions. RxNumber is unique like Mrn.
        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prescriptions::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Prescriptions::RxNumber).string().not_null().unique_key())
                    .col(ColumnDef::new(Prescriptions::PatientId).string().not_null())
                    .col(ColumnDef::new(Prescriptions::ProviderId).string().not_null())
                    .col(ColumnDef::new(Prescriptions::MedicationName).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Strength).string().not_null())
                    .col(ColumnDef::new(Prescriptions::DosageForm).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Quantity).integer().not_null())
                    .col(ColumnDef::new(Prescriptions::Refills).integer().not_null())
                    .col(ColumnDef::new(Prescriptions::Sig).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Route).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Frequency).string().not_null())
                    .col(
                        ColumnDef::new(Prescriptions::IsControlled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Prescriptions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prescriptions_patient_id")
                            .from(Prescriptions::Table, Prescriptions::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prescriptions_provider_id")
                            .from(Prescriptions::Table, Prescriptions::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prescriptions_patient_id")
                    .table(Prescriptions::Table)
                    .col(Prescriptions::PatientId)
                    .to_owned(),
            )
            .await?;

        // Vital signs
        manager
            .create_table(
                Table::create()
                    .table(VitalSigns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VitalSigns::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(VitalSigns::PatientId).string().not_null())
                    .col(ColumnDef::new(VitalSigns::BloodPressureSystolic).integer())
                    .col(ColumnDef::new(VitalSigns::BloodPressureDiastolic).integer())
                    .col(ColumnDef::new(VitalSigns::HeartRate).integer())
                    .col(ColumnDef::new(VitalSigns::Temperature).double())
                    .col(ColumnDef::new(VitalSigns::RespiratoryRate).integer())
                    .col(ColumnDef::new(VitalSigns::OxygenSaturation).integer())
                    .col(ColumnDef::new(VitalSigns::Weight).double())
                    .col(ColumnDef::new(VitalSigns::Height).double())
                    .col(ColumnDef::new(VitalSigns::PainLevel).integer())
                    .col(ColumnDef::new(VitalSigns::RecordedBy).string().not_null())
                    .col(ColumnDef::new(VitalSigns::RecordedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vital_signs_patient_id")
                            .from(VitalSigns::Table, VitalSigns::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vital_signs_patient_id")
                    .table(VitalSigns::Table)
                    .col(VitalSigns::PatientId)
                    .to_owned(),
            )
            .await?;

        // Allergies
        manager
            .create_table(
                Table::create()
                    .table(Allergies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Allergies::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Allergies::PatientId).string().not_null())
                    .col(ColumnDef::new(Allergies::Allergen).string().not_null())
                    .col(ColumnDef::new(Allergies::AllergyType).string().not_null())
                    .col(ColumnDef::new(Allergies::Reaction).string().not_null())
                    .col(ColumnDef::new(Allergies::Severity).string().not_null())
                    .col(ColumnDef::new(Allergies::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allergies_patient_id")
                            .from(Allergies::Table, Allergies::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allergies_patient_id")
                    .table(Allergies::Table)
                    .col(Allergies::PatientId)
                    .to_owned(),
            )
            .await?;

        // Medications
        manager
            .create_table(
                Table::create()
                    .table(Medications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Medications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Medications::PatientId).string().not_null())
                    .col(ColumnDef::new(Medications::MedicationName).string().not_null())
                    .col(ColumnDef::new(Medications::Dosage).string().not_null())
                    .col(ColumnDef::new(Medications::Frequency).string().not_null())
                    .col(ColumnDef::new(Medications::Route).string().not_null())
                    .col(ColumnDef::new(Medications::PrescribedBy).string())
                    .col(ColumnDef::new(Medications::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Medications::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medications_patient_id")
                            .from(Medications::Table, Medications::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_patient_id")
                    .table(Medications::Table)
                    .col(Medications::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Medications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Allergies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VitalSigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    Mrn,
    FirstName,
    LastName,
    MiddleName,
    DateOfBirth,
    Gender,
    BloodGroup,
    Email,
    PhoneNumber,
    Address,
    City,
    State,
    ZipCode,
    Country,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelation,
    InsuranceProvider,
    InsurancePolicyNumber,
    PreferredLanguage,
    SsnEncrypted,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Providers {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    NpiNumber,
    Specialty,
    LicenseNumber,
    PhoneNumber,
    AcceptingNewPatients,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    PatientId,
    ProviderId,
    ScheduledAt,
    DurationMinutes,
    AppointmentType,
    Status,
    Reason,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Prescriptions {
    Table,
    Id,
    RxNumber,
    PatientId,
    ProviderId,
    MedicationName,
    Strength,
    DosageForm,
    Quantity,
    Refills,
    Sig,
    Route,
    Frequency,
    IsControlled,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VitalSigns {
    Table,
    Id,
    PatientId,
    BloodPressureSystolic,
    BloodPressureDiastolic,
    HeartRate,
    Temperature,
    RespiratoryRate,
    OxygenSaturation,
    Weight,
    Height,
    PainLevel,
    RecordedBy,
    RecordedAt,
}

#[derive(DeriveIden)]
enum Allergies {
    Table,
    Id,
    PatientId,
    Allergen,
    AllergyType,
    Reaction,
    Severity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Medications {
    Table,
    Id,
    PatientId,
    MedicationName,
    Dosage,
    Frequency,
    Route,
    PrescribedBy,
    IsActive,
    CreatedAt,
}
