use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormType {
    Marriage,
    Birth,
    Death,
}

/// Calendar granularity a report is bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        }
    }
}

/// Sub-form as exported by the persistence layer, timestamps still unparsed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubForm {
    pub id: String,
    pub form_type: FormType,
    pub created_at: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub id: String,
    pub status: DocumentStatus,
    pub created_at: String,
    #[serde(default)]
    pub sub_forms: Vec<RawSubForm>,
}

/// One row of a flattened document/sub-form join export.
#[derive(Debug, Deserialize)]
pub struct RawJoinRow {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(rename = "status")]
    pub status: DocumentStatus,
    #[serde(rename = "documentCreatedAt")]
    pub document_created_at: String,
    #[serde(rename = "formId")]
    pub form_id: Option<String>,
    #[serde(rename = "formType")]
    pub form_type: Option<FormType>,
    #[serde(rename = "formCreatedAt")]
    pub form_created_at: Option<String>,
    #[serde(rename = "formDocumentId")]
    pub form_document_id: Option<String>,
}

/// Reference to a certificate sub-form linked to a document.
///
/// `document_id` and `created_at` are optional because dangling join rows
/// arrive without them; such refs are never counted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubForm {
    pub id: String,
    pub form_type: FormType,
    pub created_at: Option<NaiveDateTime>,
    pub document_id: Option<String>,
}

impl SubForm {
    /// Timestamp of a linked sub-form, `None` for dangling refs.
    pub fn valid_created_at(&self) -> Option<NaiveDateTime> {
        self.document_id.as_ref().and(self.created_at)
    }

    pub fn is_valid(&self) -> bool {
        self.valid_created_at().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub status: DocumentStatus,
    pub created_at: NaiveDateTime,
    pub sub_forms: Vec<SubForm>,
}

impl Document {
    pub fn valid_sub_forms(&self) -> impl Iterator<Item = &SubForm> {
        self.sub_forms.iter().filter(|f| f.is_valid())
    }
}

/// Running statistics for one period bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportGroup {
    pub total_documents: usize,
    pub processed_documents: usize,
    pub pending_documents: usize,
    pub total_processing_time_days: f64,
    pub count_for_average: usize,
    pub marriage_count: usize,
    pub birth_count: usize,
    pub death_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ReportRow {
    #[serde(rename = "period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "totalDocuments")]
    #[tabled(rename = "Total")]
    pub total_documents: usize,
    #[serde(rename = "processedDocuments")]
    #[tabled(rename = "Processed")]
    pub processed_documents: usize,
    #[serde(rename = "pendingDocuments")]
    #[tabled(rename = "Pending")]
    pub pending_documents: usize,
    #[serde(rename = "averageProcessingTime")]
    #[tabled(rename = "AvgProcessing")]
    pub average_processing_time: String,
    #[serde(rename = "marriageCount")]
    #[tabled(rename = "Marriage")]
    pub marriage_count: usize,
    #[serde(rename = "birthCount")]
    #[tabled(rename = "Birth")]
    pub birth_count: usize,
    #[serde(rename = "deathCount")]
    #[tabled(rename = "Death")]
    pub death_count: usize,
}

#[derive(Debug, Serialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationCounts {
    pub marriage: usize,
    pub birth: usize,
    pub death: usize,
}

#[derive(Debug, Serialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_documents: usize,
    pub registered_documents: usize,
    pub unregistered_documents: usize,
    pub verified_documents: usize,
    pub pending_documents: usize,
    pub other_status_documents: usize,
    pub dangling_sub_forms: usize,
    pub classifications: ClassificationCounts,
}
