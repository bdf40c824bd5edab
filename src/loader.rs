use crate::error::{ReportError, Result};
use crate::types::{Document, RawDocument, RawJoinRow, RawSubForm, SubForm};
use crate::util::{parse_optional_timestamp, parse_timestamp};
use csv::ReaderBuilder;
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub documents: usize,
    pub sub_forms: usize,
    pub dangling_sub_forms: usize,
}

/// Load a document export, picking the format from the file extension.
pub fn load_documents(path: &Path) -> Result<(Vec<Document>, LoadReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file = BufReader::new(File::open(path)?);
    let (documents, report) = match ext.as_deref() {
        Some("json") => load_json(file)?,
        Some("csv") => load_csv(file)?,
        _ => return Err(ReportError::UnsupportedInput(path.to_path_buf())),
    };
    info!(
        "loaded {} documents with {} sub-forms from {}",
        report.documents,
        report.sub_forms,
        path.display()
    );
    if report.dangling_sub_forms > 0 {
        warn!(
            "{} sub-forms are missing a document link or timestamp and will not be counted",
            report.dangling_sub_forms
        );
    }
    Ok((documents, report))
}

/// Array of documents with nested `subForms`.
pub fn load_json<R: Read>(reader: R) -> Result<(Vec<Document>, LoadReport)> {
    let raw: Vec<RawDocument> = serde_json::from_reader(reader)?;
    let total_rows = raw.len();
    let documents = raw
        .into_iter()
        .map(clean_document)
        .collect::<Result<Vec<_>>>()?;
    let report = build_report(total_rows, &documents);
    Ok((documents, report))
}

/// Flattened join export: one row per document/sub-form pair, regrouped by
/// `documentId` in first-seen order.
pub fn load_csv<R: Read>(reader: R) -> Result<(Vec<Document>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut total_rows = 0usize;
    let mut order: Vec<RawDocument> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in rdr.deserialize::<RawJoinRow>() {
        let row = result?;
        total_rows += 1;
        let slot = *index.entry(row.document_id.clone()).or_insert_with(|| {
            order.push(RawDocument {
                id: row.document_id.clone(),
                status: row.status,
                created_at: row.document_created_at.clone(),
                sub_forms: Vec::new(),
            });
            order.len() - 1
        });
        // Rows with an empty form side describe a document without sub-forms.
        if let (Some(id), Some(form_type)) = (row.form_id, row.form_type) {
            order[slot].sub_forms.push(RawSubForm {
                id,
                form_type,
                created_at: row.form_created_at,
                document_id: row.form_document_id,
            });
        }
    }

    let documents = order
        .into_iter()
        .map(clean_document)
        .collect::<Result<Vec<_>>>()?;
    let report = build_report(total_rows, &documents);
    Ok((documents, report))
}

fn clean_document(raw: RawDocument) -> Result<Document> {
    let created_at = parse_timestamp(&raw.created_at, &format!("document {} createdAt", raw.id))?;
    let sub_forms = raw
        .sub_forms
        .into_iter()
        .map(|f| {
            let field = format!("sub-form {} createdAt", f.id);
            Ok(SubForm {
                created_at: parse_optional_timestamp(f.created_at.as_deref(), &field)?,
                id: f.id,
                form_type: f.form_type,
                document_id: f.document_id.filter(|d| !d.trim().is_empty()),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Document {
        id: raw.id,
        status: raw.status,
        created_at,
        sub_forms,
    })
}

fn build_report(total_rows: usize, documents: &[Document]) -> LoadReport {
    let sub_forms = documents.iter().map(|d| d.sub_forms.len()).sum();
    let dangling_sub_forms = documents
        .iter()
        .flat_map(|d| d.sub_forms.iter())
        .filter(|f| !f.is_valid())
        .count();
    LoadReport {
        total_rows,
        documents: documents.len(),
        sub_forms,
        dangling_sub_forms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentStatus, FormType};
    use std::io::Write;

    const JSON: &str = r#"[
        {
            "id": "doc-1",
            "status": "VERIFIED",
            "createdAt": "2024-03-15T00:00:00Z",
            "subForms": [
                {
                    "id": "f-1",
                    "formType": "BIRTH",
                    "createdAt": "2024-03-10T00:00:00Z",
                    "documentId": "doc-1"
                },
                {"id": "f-2", "formType": "DEATH", "createdAt": null, "documentId": "doc-1"}
            ]
        },
        {"id": "doc-2", "status": "ARCHIVED", "createdAt": "2023-01-01"}
    ]"#;

    const CSV: &str = "\
documentId,status,documentCreatedAt,formId,formType,formCreatedAt,formDocumentId
doc-1,PENDING,2024-03-15,f-1,BIRTH,2024-03-10,doc-1
doc-2,REJECTED,2024-04-01,,,,
doc-1,PENDING,2024-03-15,f-2,MARRIAGE,2024-03-12,
";

    #[test]
    fn json_export_loads_with_nested_forms() {
        let (docs, report) = load_json(JSON.as_bytes()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].sub_forms.len(), 2);
        assert_eq!(docs[0].sub_forms[0].form_type, FormType::Birth);
        assert_eq!(docs[1].status, DocumentStatus::Other);
        assert!(docs[1].sub_forms.is_empty());
        assert_eq!(
            report,
            LoadReport {
                total_rows: 2,
                documents: 2,
                sub_forms: 2,
                dangling_sub_forms: 1
            }
        );
    }

    #[test]
    fn csv_join_rows_regroup_by_document() {
        let (docs, report) = load_csv(CSV.as_bytes()).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["doc-1", "doc-2"]);
        assert_eq!(docs[0].sub_forms.len(), 2);
        assert!(docs[0].sub_forms[1].document_id.is_none());
        assert!(docs[1].sub_forms.is_empty());
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.dangling_sub_forms, 1);
    }

    #[test]
    fn malformed_timestamp_aborts_load() {
        let bad = r#"[{"id": "d", "status": "PENDING", "createdAt": "yesterday"}]"#;
        let err = load_json(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidTimestamp { .. }));

        let bad_form = "\
documentId,status,documentCreatedAt,formId,formType,formCreatedAt,formDocumentId
d,PENDING,2024-01-01,f,BIRTH,13/01/2024,d
";
        assert!(matches!(
            load_csv(bad_form.as_bytes()),
            Err(ReportError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn unknown_form_type_is_rejected() {
        let bad = r#"[{"id": "d", "status": "PENDING", "createdAt": "2024-01-01",
            "subForms": [{"id": "f", "formType": "ADOPTION",
                          "createdAt": "2024-01-01", "documentId": "d"}]}]"#;
        assert!(matches!(load_json(bad.as_bytes()), Err(ReportError::Json(_))));
    }

    #[test]
    fn load_documents_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("export.JSON");
        std::fs::File::create(&json_path).unwrap().write_all(JSON.as_bytes()).unwrap();
        let (docs, _) = load_documents(&json_path).unwrap();
        assert_eq!(docs.len(), 2);

        let csv_path = dir.path().join("export.csv");
        std::fs::write(&csv_path, CSV).unwrap();
        let (docs, _) = load_documents(&csv_path).unwrap();
        assert_eq!(docs.len(), 2);

        let other = dir.path().join("export.xml");
        std::fs::write(&other, "<docs/>").unwrap();
        assert!(matches!(load_documents(&other), Err(ReportError::UnsupportedInput(_))));
    }
}
