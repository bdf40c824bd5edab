use crate::error::Result;
use crate::period::{period_key, periods_in_year, PeriodKey};
use crate::types::{
    ClassificationCounts, Document, DocumentStatus, FormType, Granularity, ReportGroup, ReportRow,
    ReportSummary, SubForm,
};
use crate::util::{days_between, format_average_days};
use chrono::{Datelike, NaiveDateTime};
use log::debug;
use std::collections::BTreeMap;

/// Canonical registration timestamp of a document: the earliest `created_at`
/// among its linked sub-forms. `None` when no sub-form is linked.
pub fn derive_registration_date(document: &Document) -> Option<NaiveDateTime> {
    document
        .sub_forms
        .iter()
        .filter_map(SubForm::valid_created_at)
        .min()
}

fn count_form(group: &mut ReportGroup, form_type: FormType) {
    match form_type {
        FormType::Marriage => group.marriage_count += 1,
        FormType::Birth => group.birth_count += 1,
        FormType::Death => group.death_count += 1,
    }
}

/// Fold documents into sparse per-period statistics.
///
/// Documents without a linked sub-form are skipped entirely; they are never
/// bucketed by their own `created_at`.
pub fn group_documents(
    documents: &[Document],
    granularity: Granularity,
) -> BTreeMap<PeriodKey, ReportGroup> {
    let mut map: BTreeMap<PeriodKey, ReportGroup> = BTreeMap::new();
    let mut skipped = 0usize;
    for doc in documents {
        let Some(registered_at) = derive_registration_date(doc) else {
            skipped += 1;
            continue;
        };
        let g = map
            .entry(period_key(registered_at.date(), granularity))
            .or_default();
        g.total_documents += 1;
        match doc.status {
            DocumentStatus::Verified => g.processed_documents += 1,
            DocumentStatus::Pending => g.pending_documents += 1,
            _ => {}
        }
        // Not clamped: a negative value means the document row predates its
        // earliest sub-form.
        g.total_processing_time_days += days_between(registered_at, doc.created_at);
        g.count_for_average += 1;
        for form in doc.valid_sub_forms() {
            count_form(g, form.form_type);
        }
    }
    debug!(
        "grouped {} documents into {} {} buckets ({} without linked sub-forms)",
        documents.len() - skipped,
        map.len(),
        granularity.as_str(),
        skipped
    );
    map
}

fn to_row(key: &PeriodKey, group: &ReportGroup) -> ReportRow {
    ReportRow {
        period: key.to_string(),
        total_documents: group.total_documents,
        processed_documents: group.processed_documents,
        pending_documents: group.pending_documents,
        average_processing_time: format_average_days(
            group.total_processing_time_days,
            group.count_for_average,
        ),
        marriage_count: group.marriage_count,
        birth_count: group.birth_count,
        death_count: group.death_count,
    }
}

/// Dense, chronological rows for every period of `year`, with all-zero rows
/// where `groups` has no entry.
pub fn zero_fill(
    groups: &BTreeMap<PeriodKey, ReportGroup>,
    granularity: Granularity,
    year: i32,
) -> Result<Vec<ReportRow>> {
    let empty = ReportGroup::default();
    let rows = periods_in_year(granularity, year)?
        .iter()
        .map(|key| to_row(key, groups.get(key).unwrap_or(&empty)))
        .collect();
    Ok(rows)
}

/// Inclusive calendar-year span covered by the input.
///
/// Linked sub-form timestamps decide the span. Only when no document has any
/// linked sub-form do the documents' own `created_at` years bound it.
pub fn detect_year_range(documents: &[Document]) -> Option<(i32, i32)> {
    let mut years: Vec<i32> = documents
        .iter()
        .flat_map(|d| d.sub_forms.iter())
        .filter_map(SubForm::valid_created_at)
        .map(|t| t.year())
        .collect();
    if years.is_empty() {
        years = documents.iter().map(|d| d.created_at.year()).collect();
    }
    let min = years.iter().copied().min()?;
    let max = years.iter().copied().max()?;
    Some((min, max))
}

/// Zero-filled rows for every year the input spans, ascending. Empty input
/// yields no rows.
pub fn zero_fill_all_years(
    groups: &BTreeMap<PeriodKey, ReportGroup>,
    granularity: Granularity,
    documents: &[Document],
) -> Result<Vec<ReportRow>> {
    let Some((min_year, max_year)) = detect_year_range(documents) else {
        debug!("no timestamps found, nothing to report");
        return Ok(Vec::new());
    };
    debug!("detected report years {}..={}", min_year, max_year);
    let mut rows = Vec::new();
    for year in min_year..=max_year {
        rows.extend(zero_fill(groups, granularity, year)?);
    }
    Ok(rows)
}

/// Flat tally of linked sub-forms by type, independent of any bucketing.
pub fn count_classifications(documents: &[Document]) -> ClassificationCounts {
    let mut counts = ClassificationCounts::default();
    for form in documents.iter().flat_map(|d| d.valid_sub_forms()) {
        match form.form_type {
            FormType::Marriage => counts.marriage += 1,
            FormType::Birth => counts.birth += 1,
            FormType::Death => counts.death += 1,
        }
    }
    counts
}

/// Full bucketed report: for one year when `year` is given, otherwise for
/// every year the input spans.
pub fn generate_report(
    documents: &[Document],
    granularity: Granularity,
    year: Option<i32>,
) -> Result<Vec<ReportRow>> {
    let groups = group_documents(documents, granularity);
    match year {
        Some(y) => zero_fill(&groups, granularity, y),
        None => zero_fill_all_years(&groups, granularity, documents),
    }
}

pub fn generate_summary(documents: &[Document]) -> ReportSummary {
    let mut summary = ReportSummary {
        total_documents: documents.len(),
        classifications: count_classifications(documents),
        ..ReportSummary::default()
    };
    for doc in documents {
        if derive_registration_date(doc).is_some() {
            summary.registered_documents += 1;
        } else {
            summary.unregistered_documents += 1;
        }
        match doc.status {
            DocumentStatus::Verified => summary.verified_documents += 1,
            DocumentStatus::Pending => summary.pending_documents += 1,
            _ => summary.other_status_documents += 1,
        }
        summary.dangling_sub_forms += doc.sub_forms.iter().filter(|f| !f.is_valid()).count();
    }
    summary
}
