//! Activity listing against the mock submissions backend

use std::sync::Arc;

use domain_activity::{
    ActivityColumn, ActivityError, ActivityQuery, ActivityService, MergeOptions, SortSpec,
};
use domain_submission::{
    Assessment, DraftStore, InMemoryDraftStore, MockSubmissionPort, PortCall, SubmissionFilter,
    WizardController,
};
use proptest::prelude::*;
use test_utils::{
    activity_row_strategy, assert_dashboard_id, assert_err_variant, assessment_strategy,
    sort_spec_strategy, ApplicationBuilder, IdFixtures, ReviewBuilder,
};

#[tokio::test]
async fn test_listing_merges_quotes() {
    let a = ApplicationBuilder::new()
        .with_reference(IdFixtures::submission_id().as_str(), "1.0")
        .with_insured_name("Acme Holdings")
        .build();
    let b = ApplicationBuilder::new().with_insured_name("Beta Labs").build();
    let quote = ReviewBuilder::for_id(&IdFixtures::submission_id())
        .with_assessment(Assessment::Accepted)
        .build();
    let port = MockSubmissionPort::with_data(vec![a, b], vec![quote]).await;

    let page = ActivityService::default()
        .page(&port, &ActivityQuery::default())
        .await
        .unwrap();

    assert_eq!(page.total_items, 2);
    assert_eq!(page.rows[0].id, Some(IdFixtures::submission_id()));
    assert_eq!(page.rows[0].assessment, Assessment::Accepted);
    assert!(!page.rows[0].is_editable());
    assert!(page.rows[1].id.is_none());
    assert_eq!(page.rows[1].assessment, Assessment::Created);
    assert!(page.rows[1].is_editable());
    assert_eq!(port.calls().await, vec![PortCall::ListSubmissions, PortCall::ListQuotes]);
}

#[tokio::test]
async fn test_unsaved_row_receives_fresh_id_on_next_save() {
    let a = ApplicationBuilder::new()
        .with_reference(IdFixtures::submission_id().as_str(), "1.0")
        .build();
    let b = ApplicationBuilder::new().with_insured_name("Beta Labs").build();
    let port = MockSubmissionPort::with_data(vec![a, b.clone()], vec![]).await;
    let service = ActivityService::default();

    let rows = service.load_rows(&port).await.unwrap();
    assert_eq!(rows[0].id, Some(IdFixtures::submission_id()));
    assert!(rows[1].id.is_none());

    let drafts: Arc<dyn DraftStore> = Arc::new(InMemoryDraftStore::default());
    let mut wizard = WizardController::from_application(drafts, b).await;
    wizard.save(&port).await.unwrap();

    let new_id = wizard.application().id().cloned().unwrap();
    assert_dashboard_id(&new_id);
    assert_ne!(new_id, IdFixtures::submission_id());

    let rows = service.load_rows(&port).await.unwrap();
    assert_eq!(rows[0].id, Some(IdFixtures::submission_id()));
    assert!(rows.iter().any(|r| r.id.as_ref() == Some(&new_id)));
}

#[tokio::test]
async fn test_listing_uses_configured_default_and_carrier() {
    let ours = ApplicationBuilder::new().with_insured_name("Ours").build();
    let theirs = ApplicationBuilder::new()
        .with_insured_name("Theirs")
        .with_carrier("Other Carrier")
        .build();
    let port = MockSubmissionPort::with_data(vec![ours, theirs], vec![]).await;
    let service = ActivityService::new(
        MergeOptions { default_assessment: Assessment::Approved },
        SubmissionFilter::default(),
    );

    let rows = service.load_rows(&port).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].insured_name, "Ours");
    assert_eq!(rows[0].assessment, Assessment::Approved);
}

#[tokio::test]
async fn test_backend_failure_fails_listing() {
    let port = MockSubmissionPort::new();
    port.fail_with("down").await;

    let result = ActivityService::default().load_rows(&port).await;

    assert_err_variant!(result, ActivityError::Port(_));
}

#[tokio::test]
async fn test_sorted_listing() {
    let port = MockSubmissionPort::with_data(
        vec![
            ApplicationBuilder::new().with_insured_name("zeta").build(),
            ApplicationBuilder::new().with_insured_name("Alpha").build(),
        ],
        vec![],
    )
    .await;
    let query = ActivityQuery {
        sort: Some(SortSpec::asc(ActivityColumn::InsuredName)),
        ..Default::default()
    };

    let page = ActivityService::default().page(&port, &query).await.unwrap();

    let names: Vec<_> = page.rows.iter().map(|r| r.insured_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "zeta"]);
}

proptest! {
    #[test]
    fn prop_filtered_rows_match_query(
        rows in prop::collection::vec(activity_row_strategy(), 0..40),
        search in "[a-zA-Z ]{0,3}",
        assessment in prop::option::of(assessment_strategy()),
    ) {
        let query = ActivityQuery {
            search: Some(search.clone()),
            assessment: assessment.clone(),
            page_size: 1000,
            ..Default::default()
        };
        let page = query.apply(&rows).unwrap();
        let needle = search.to_lowercase();

        prop_assert!(page.total_items <= page.unfiltered_items);
        prop_assert_eq!(page.unfiltered_items, rows.len());
        for row in &page.rows {
            prop_assert!(
                search.trim().is_empty()
                    || row.insured_name.to_lowercase().contains(&needle)
                    || row.broker_name.to_lowercase().contains(&needle)
            );
            if let Some(expected) = &assessment {
                prop_assert_eq!(&row.assessment, expected);
            }
        }
    }

    #[test]
    fn prop_editable_iff_not_terminal(row in activity_row_strategy()) {
        let terminal = matches!(row.assessment, Assessment::Accepted | Assessment::Rejected);
        prop_assert_eq!(row.is_editable(), !terminal);
    }

    #[test]
    fn prop_sorting_keeps_every_row(
        rows in prop::collection::vec(activity_row_strategy(), 0..30),
        spec in sort_spec_strategy(),
    ) {
        let query = ActivityQuery { sort: Some(spec), page_size: 1000, ..Default::default() };
        let page = query.apply(&rows).unwrap();
        prop_assert_eq!(page.rows.len(), rows.len());
    }

    #[test]
    fn prop_pages_partition_rows(
        rows in prop::collection::vec(activity_row_strategy(), 0..60),
        page_size in prop::sample::select(domain_activity::PAGE_SIZE_OPTIONS.to_vec()),
    ) {
        let mut seen = 0;
        let mut page = 1;
        loop {
            let query = ActivityQuery { page, page_size, ..Default::default() };
            let result = query.apply(&rows).unwrap();
            if result.rows.is_empty() {
                break;
            }
            prop_assert!(result.rows.len() <= page_size);
            seen += result.rows.len();
            page += 1;
        }
        prop_assert_eq!(seen, rows.len());
    }
}
