use super::common::*;
use crate::screening::domain::{Document, DocumentFormat};
use crate::screening::record::RecordStatus;
use crate::screening::report::views::{MISSING_GRADE, REJECTED_MARKER, SHORTLISTED_MARKER};
use crate::screening::ShortlistService;

#[test]
fn batch_shortlists_graded_cv_and_rejects_ungraded_one() {
    let extractor = CannedExtractor::default()
        .with_text("alice.pdf", STRONG_CV)
        .with_text("bob.pdf", UNGRADED_CV);
    let service = canned_service(extractor, criteria('C', 'C', true));

    let table = service.run(vec![empty_document("alice.pdf"), empty_document("bob.pdf")]);

    assert_eq!(table.len(), 2);
    let rows = table.rows();

    assert_eq!(rows[0].name, "alice");
    assert_eq!(rows[0].ol_english, "A");
    assert_eq!(rows[0].al_general_english, "B");
    assert_eq!(rows[0].customer_exp, "Yes");
    assert_eq!(rows[0].skills, "Customer");
    assert_eq!(rows[0].shortlisted, SHORTLISTED_MARKER);

    assert_eq!(rows[1].name, "bob");
    assert_eq!(rows[1].ol_english, MISSING_GRADE);
    assert_eq!(rows[1].al_general_english, MISSING_GRADE);
    assert_eq!(rows[1].skills, "Teamwork");
    assert_eq!(rows[1].shortlisted, REJECTED_MARKER);

    assert_eq!(table.shortlisted_count(), 1);
}

#[test]
fn single_year_is_not_counted_as_experience() {
    let extractor = CannedExtractor::default().with_text(
        "carol.pdf",
        "English: A\nGeneral English: B\nExperience 1 year\nCustomer focus",
    );

    let lenient = canned_service(extractor, criteria('C', 'C', false));
    let record = lenient.screen(&empty_document("carol.pdf"));
    assert!(!record.fields.customer_experience);
    assert!(record.is_shortlisted());

    let extractor = CannedExtractor::default().with_text(
        "carol.pdf",
        "English: A\nGeneral English: B\nExperience 1 year\nCustomer focus",
    );
    let strict = canned_service(extractor, criteria('C', 'C', true));
    assert!(!strict.screen(&empty_document("carol.pdf")).is_shortlisted());
}

#[test]
fn language_suffix_does_not_inflate_the_grade() {
    let extractor = CannedExtractor::default().with_text(
        "erandi.pdf",
        "English Language: C\nGeneral English: A\nExperience 3 years",
    );
    let service = canned_service(extractor, criteria('B', 'B', false));

    let record = service.screen(&empty_document("erandi.pdf"));

    assert_eq!(record.fields.ol_english, Some(grade('C')));
    assert_eq!(record.fields.al_general_english, Some(grade('A')));
    assert!(!record.is_shortlisted());
}

#[test]
fn unreadable_file_does_not_abort_the_batch() {
    let extractor = CannedExtractor::default()
        .with_text("first.pdf", STRONG_CV)
        .with_failure("broken.pdf", "unexpected end of stream")
        .with_text("last.pdf", STRONG_CV);
    let service = canned_service(extractor, criteria('C', 'C', false));

    let table = service.run(vec![
        empty_document("first.pdf"),
        empty_document("broken.pdf"),
        empty_document("last.pdf"),
    ]);

    assert_eq!(table.len(), 3);
    assert_eq!(table.unprocessable_count(), 1);
    assert_eq!(table.shortlisted_count(), 2);

    let broken = &table.records()[1];
    assert!(broken.is_unprocessable());
    assert!(!broken.is_shortlisted());
    let warning = broken.status.warning().expect("unprocessable rows carry a warning");
    assert!(warning.contains("unexpected end of stream"));

    let row = &table.rows()[1];
    assert_eq!(row.name, "broken");
    assert_eq!(row.ol_english, MISSING_GRADE);
    assert_eq!(row.customer_exp, "No");
    assert_eq!(row.shortlisted, REJECTED_MARKER);
}

#[test]
fn unsupported_extension_yields_empty_rejected_row() {
    let service = ShortlistService::new(criteria('C', 'C', false), &["Customer"])
        .expect("service builds");

    let record = service.screen(&Document::new("notes.txt", b"English: A".to_vec()));

    assert_eq!(record.format, DocumentFormat::Unsupported);
    assert_eq!(record.status, RecordStatus::UnsupportedFormat);
    assert!(record.status.warning().is_some());
    assert_eq!(record.fields.ol_english, None);
    assert!(!record.is_shortlisted());
}

#[test]
fn docx_upload_runs_through_the_real_extractor() {
    let service = ShortlistService::new(criteria('C', 'C', true), &["Customer", "Teamwork"])
        .expect("service builds");
    let document = docx_document(
        "dana.silva.docx",
        &[
            "O/L English: B",
            "A/L General English: C",
            "Customer service Experience: 3 years",
            "Teamwork and customer care",
        ],
    );

    let record = service.screen(&document);

    assert_eq!(record.status, RecordStatus::Screened);
    assert_eq!(record.name, "dana");
    assert_eq!(record.fields.ol_english, Some(grade('B')));
    assert_eq!(record.fields.al_general_english, Some(grade('C')));
    assert!(record.fields.customer_experience);
    assert_eq!(record.fields.skills, "Customer, Teamwork, customer");
    assert!(record.is_shortlisted());
}

#[test]
fn malformed_documents_are_marked_unprocessable() {
    let service = ShortlistService::new(criteria('C', 'C', false), &["Customer"])
        .expect("service builds");

    let table = service.run(vec![
        Document::new("legacy.doc", b"\xD0\xCF\x11\xE0 not a zip".to_vec()),
        Document::new("scan.pdf", b"%PDF-1.4 truncated".to_vec()),
        docx_document("ok.docx", &["English: A", "General English: A"]),
    ]);

    let statuses: Vec<&str> = table
        .records()
        .iter()
        .map(|record| record.status.label())
        .collect();
    assert_eq!(statuses, ["unprocessable", "unprocessable", "screened"]);
    assert!(table.records()[2].is_shortlisted());
}

#[test]
fn empty_supported_files_screen_as_empty_text() {
    let service = ShortlistService::new(criteria('C', 'C', false), &["Customer"])
        .expect("service builds");

    for name in ["blank.pdf", "blank.docx", "blank.doc"] {
        let record = service.screen(&empty_document(name));
        assert_eq!(record.status, RecordStatus::Screened, "{name}");
        assert_eq!(record.fields.skills, "");
        assert!(!record.is_shortlisted());
    }
}
