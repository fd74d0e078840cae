use minicrm_core::prefs::{FILTERS_KEY, SEARCH_QUERY_KEY, SORT_OPTIONS_KEY};
use minicrm_core::{
    create_lead, Coordinator, ErrorKind, InMemoryLeadRepository, LeadFilters, LeadFiltersPatch,
    LeadPatch, LeadRepository, LeadService, LeadSource, LeadStatus, MemoryPreferenceStore,
    OpportunityPatch, OpportunityStage, PreferenceStore, Preferences, SortDirection, SortField,
    SortOptions, SortOptionsPatch, SqlitePreferenceStore,
};
use std::sync::Arc;

type MemoryCoordinator = Coordinator<InMemoryLeadRepository, MemoryPreferenceStore>;

fn ann_lee() -> minicrm_core::Lead {
    create_lead(LeadPatch {
        name: Some("Ann Lee".to_string()),
        company: Some("Acme".to_string()),
        email: Some("ann@acme.com".to_string()),
        score: Some(90),
        status: Some(LeadStatus::New),
        ..LeadPatch::default()
    })
}

fn coordinator_with_ann() -> (MemoryCoordinator, String) {
    let mut leads = InMemoryLeadRepository::seeded(40, 21)
        .list_leads()
        .into_iter()
        .filter(|lead| !lead.is_converted())
        .collect::<Vec<_>>();
    let ann = ann_lee();
    let id = ann.id.clone();
    leads.insert(0, ann);

    let service = Arc::new(LeadService::new(InMemoryLeadRepository::with_records(
        leads,
        Vec::new(),
    )));
    let coordinator = Coordinator::new(service, Preferences::new(MemoryPreferenceStore::new()));
    (coordinator, id)
}

#[tokio::test(start_paused = true)]
async fn initial_load_fetches_leads_and_opportunities() {
    let service = Arc::new(LeadService::new(InMemoryLeadRepository::seeded(100, 42)));
    let coordinator = Coordinator::new(service, Preferences::new(MemoryPreferenceStore::new()));

    let state = coordinator.snapshot();
    assert!(state.leads.is_empty());
    assert_eq!(state.sort_options, SortOptions::default());

    coordinator.load_initial_data().await;
    let state = coordinator.snapshot();
    assert_eq!(state.leads.len(), 100);
    let converted = state.leads.iter().filter(|lead| lead.is_converted()).count();
    assert_eq!(state.opportunities.len(), converted);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn search_replaces_leads_with_filtered_result() {
    let (coordinator, id) = coordinator_with_ann();
    coordinator.load_initial_data().await;

    coordinator
        .search_leads(
            "acme",
            LeadFilters {
                status: Some(LeadStatus::New),
                source: None,
            },
            Some(SortOptions::new(SortField::Name, SortDirection::Asc)),
        )
        .await;

    let leads = coordinator.leads();
    assert!(leads.iter().any(|lead| lead.id == id));
    assert!(leads.iter().all(|lead| lead.status == LeadStatus::New));
    assert!(!coordinator.is_loading());
}

#[tokio::test(start_paused = true)]
async fn search_without_sort_uses_current_sort_options() {
    let (coordinator, _) = coordinator_with_ann();
    coordinator.set_sort_options(SortOptionsPatch {
        field: Some(SortField::Score),
        direction: Some(SortDirection::Asc),
    });

    coordinator.search_leads("", LeadFilters::default(), None).await;
    let leads = coordinator.leads();
    assert!(!leads.is_empty());
    for pair in leads.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
}

#[tokio::test(start_paused = true)]
async fn overlapping_searches_apply_latest_result() {
    let (coordinator, _) = coordinator_with_ann();
    coordinator.load_initial_data().await;

    let broad = coordinator.search_leads("", LeadFilters::default(), None);
    let narrow = coordinator.search_leads("ann@acme.com", LeadFilters::default(), None);
    tokio::join!(broad, narrow);

    let leads = coordinator.leads();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Ann Lee");
}

#[tokio::test(start_paused = true)]
async fn update_lead_refreshes_list_and_selection() {
    let (coordinator, id) = coordinator_with_ann();
    coordinator.load_initial_data().await;
    let ann = coordinator
        .leads()
        .into_iter()
        .find(|lead| lead.id == id)
        .unwrap();
    coordinator.select_lead(Some(ann));

    let updated = coordinator
        .update_lead(
            &id,
            LeadPatch {
                status: Some(LeadStatus::Qualified),
                source: Some(LeadSource::TradeShow),
                ..LeadPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, LeadStatus::Qualified);
    assert_eq!(coordinator.selected_lead(), Some(updated.clone()));
    assert!(coordinator.leads().contains(&updated));
    assert!(!coordinator.is_loading());
}

#[tokio::test(start_paused = true)]
async fn failed_update_records_error_and_returns_it() {
    let (coordinator, id) = coordinator_with_ann();
    coordinator.load_initial_data().await;
    let before = coordinator.leads();

    let err = coordinator
        .update_lead(
            &id,
            LeadPatch {
                score: Some(150),
                ..LeadPatch::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(coordinator.error(), Some(err.to_string()));
    assert!(!coordinator.is_loading());
    assert_eq!(coordinator.leads(), before);

    coordinator.search_leads("", LeadFilters::default(), None).await;
    assert!(coordinator.error().is_some());

    coordinator.clear_error();
    assert!(coordinator.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn convert_appends_opportunity_and_refreshes_lead() {
    let (coordinator, id) = coordinator_with_ann();
    coordinator.load_initial_data().await;
    let ann = coordinator
        .leads()
        .into_iter()
        .find(|lead| lead.id == id)
        .unwrap();
    coordinator.select_lead(Some(ann));
    let opportunities_before = coordinator.opportunities().len();

    let opportunity = coordinator
        .convert_to_opportunity(
            &id,
            OpportunityPatch {
                amount: Some(25_000.0),
                ..OpportunityPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(opportunity.stage, OpportunityStage::Prospecting);
    assert_eq!(opportunity.amount, Some(25_000.0));
    assert_eq!(opportunity.lead_id, id);
    assert_eq!(coordinator.opportunities().len(), opportunities_before + 1);
    assert_eq!(
        coordinator.selected_lead().map(|lead| lead.status),
        Some(LeadStatus::Converted)
    );
    let listed = coordinator
        .leads()
        .into_iter()
        .find(|lead| lead.id == id)
        .unwrap();
    assert_eq!(listed.status, LeadStatus::Converted);
}

#[tokio::test(start_paused = true)]
async fn convert_unknown_lead_records_not_found() {
    let (coordinator, _) = coordinator_with_ann();
    coordinator.load_initial_data().await;
    let before = coordinator.opportunities().len();

    let err = coordinator
        .convert_to_opportunity("missing", OpportunityPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(coordinator.opportunities().len(), before);
    assert_eq!(
        coordinator.service().get_opportunities().await.unwrap().len(),
        before
    );
    assert!(coordinator.error().is_some());
}

#[test]
fn filter_and_sort_setters_merge_and_persist() {
    let (coordinator, _) = coordinator_with_ann();

    coordinator.set_filters(LeadFiltersPatch {
        status: Some(Some(LeadStatus::Contacted)),
        source: None,
    });
    coordinator.set_filters(LeadFiltersPatch {
        status: None,
        source: Some(Some(LeadSource::Website)),
    });
    coordinator.set_sort_options(SortOptionsPatch {
        field: Some(SortField::Name),
        direction: None,
    });
    coordinator.set_search_query("acme");

    let state = coordinator.snapshot();
    let expected_filters = LeadFilters {
        status: Some(LeadStatus::Contacted),
        source: Some(LeadSource::Website),
    };
    assert_eq!(state.filters, expected_filters);
    assert_eq!(
        state.sort_options,
        SortOptions::new(SortField::Name, SortDirection::Desc)
    );
    assert_eq!(state.search_query, "acme");

    let prefs = coordinator.preferences();
    assert_eq!(prefs.get(FILTERS_KEY, LeadFilters::default()), expected_filters);
    assert_eq!(
        prefs.get(SORT_OPTIONS_KEY, SortOptions::default()),
        SortOptions::new(SortField::Name, SortDirection::Desc)
    );
    assert_eq!(prefs.get(SEARCH_QUERY_KEY, String::new()), "acme");
}

#[test]
fn persisted_preferences_are_restored_on_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    {
        let prefs = Preferences::new(SqlitePreferenceStore::open(&path).unwrap());
        let coordinator = Coordinator::new(
            Arc::new(LeadService::new(InMemoryLeadRepository::new())),
            prefs,
        );
        coordinator.set_filters(LeadFiltersPatch {
            status: Some(Some(LeadStatus::Qualified)),
            source: None,
        });
        coordinator.set_sort_options(SortOptionsPatch {
            field: Some(SortField::CreatedAt),
            direction: Some(SortDirection::Asc),
        });
    }

    let prefs = Preferences::new(SqlitePreferenceStore::open(&path).unwrap());
    let coordinator = Coordinator::new(
        Arc::new(LeadService::new(InMemoryLeadRepository::new())),
        prefs,
    );
    let state = coordinator.snapshot();
    assert_eq!(state.filters.status, Some(LeadStatus::Qualified));
    assert_eq!(state.filters.source, None);
    assert_eq!(
        state.sort_options,
        SortOptions::new(SortField::CreatedAt, SortDirection::Asc)
    );
}

#[test]
fn corrupt_preferences_fall_back_to_defaults() {
    let store = MemoryPreferenceStore::new();
    store.set_raw(SORT_OPTIONS_KEY, "{\"field\":\"bogus\"}").unwrap();
    store.set_raw(FILTERS_KEY, "not json").unwrap();

    let coordinator = Coordinator::new(
        Arc::new(LeadService::new(InMemoryLeadRepository::new())),
        Preferences::new(store),
    );
    let state = coordinator.snapshot();
    assert_eq!(state.sort_options, SortOptions::default());
    assert!(state.filters.is_empty());
}
