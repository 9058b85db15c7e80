//! Integration tests for the report repository.

mod common;

use chrono::Utc;
use common::{cleanup_client, connect, date, setup_client, simple_entry};
use ledgerwise_core::dimension::{
    DimensionFilter, DimensionTag, PendingDimensionValue, TagLookup,
};
use ledgerwise_core::journal::EntryStatus;
use ledgerwise_core::reports::ReportPeriod;
use ledgerwise_db::entities::{consolidation_group_members, consolidation_groups, dimension_values};
use ledgerwise_db::repositories::{
    DimensionRepository, JournalRepository, ReportRepository, ReportRepositoryError,
};
use ledgerwise_shared::types::ConsolidationGroupId;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

#[tokio::test]
async fn test_statements_from_posted_entries() {
    let Some(db) = connect().await else { return };
    let Ok(client) = setup_client(&db).await else { return };
    let journal = JournalRepository::new(db.clone());
    let reports = ReportRepository::new(db.clone());

    let sale = simple_entry(
        &client,
        client.hq,
        date(2026, 1, 10),
        client.cash,
        client.revenue,
        dec!(1000),
        EntryStatus::Posted,
    );
    let rent = simple_entry(
        &client,
        client.hq,
        date(2026, 1, 20),
        client.expense,
        client.cash,
        dec!(300),
        EntryStatus::Posted,
    );
    let draft = simple_entry(
        &client,
        client.hq,
        date(2026, 1, 25),
        client.expense,
        client.cash,
        dec!(999),
        EntryStatus::Draft,
    );
    journal
        .create_entries(&[sale, rent, draft])
        .await
        .expect("create entries");

    let period = ReportPeriod::new(Some(date(2026, 1, 1)), date(2026, 1, 31)).unwrap();
    let income = reports
        .income_statement(client.client_id, None, &period, &DimensionFilter::new())
        .await
        .unwrap();
    assert_eq!(income.revenue.total, dec!(1000));
    assert_eq!(income.operating_expenses.total, dec!(300));
    assert_eq!(income.net_income, dec!(700));

    let sheet = reports
        .balance_sheet(client.client_id, None, date(2026, 1, 31))
        .await
        .unwrap();
    assert_eq!(sheet.total_assets, dec!(700));
    assert_eq!(sheet.current_earnings, dec!(700));
    assert!(sheet.is_balanced);

    cleanup_client(&db, &client).await;
}

#[tokio::test]
async fn test_dimension_filter_limits_trial_balance() {
    let Some(db) = connect().await else { return };
    let Ok(client) = setup_client(&db).await else { return };
    let journal = JournalRepository::new(db.clone());
    let dimensions = DimensionRepository::new(db.clone());
    let reports = ReportRepository::new(db.clone());

    let department = dimensions
        .create_dimension(client.client_id, "DEPT", "Department")
        .await
        .unwrap();
    let sales = dimensions
        .approve_value(
            client.client_id,
            &PendingDimensionValue {
                dimension_id: department.id,
                dimension_name: department.name.clone(),
                value_name: "Sales".into(),
            },
        )
        .await
        .unwrap();

    let mut tagged = simple_entry(
        &client,
        client.hq,
        date(2026, 4, 2),
        client.expense,
        client.cash,
        dec!(80),
        EntryStatus::Posted,
    );
    tagged.lines[0].dimensions.push(DimensionTag {
        dimension_id: department.id,
        dimension_value_id: sales.id,
        dimension_name: department.name.clone(),
        value_name: sales.name.clone(),
    });
    let untagged = simple_entry(
        &client,
        client.hq,
        date(2026, 4, 3),
        client.expense,
        client.cash,
        dec!(20),
        EntryStatus::Posted,
    );
    journal.create_entries(&[tagged, untagged]).await.unwrap();

    let filter = DimensionFilter::new().with_value(sales.id);
    let trial = reports
        .trial_balance(
            client.client_id,
            None,
            &ReportPeriod::as_of(date(2026, 4, 30)),
            &filter,
        )
        .await
        .unwrap();
    let rent = trial
        .accounts
        .iter()
        .find(|a| a.account_id == client.expense)
        .expect("rent balance");
    assert_eq!(rent.total_debit, dec!(80));

    cleanup_client(&db, &client).await;
}

#[tokio::test]
async fn test_approving_inactive_value_reactivates_it() {
    let Some(db) = connect().await else { return };
    let Ok(client) = setup_client(&db).await else { return };
    let dimensions = DimensionRepository::new(db.clone());

    let department = dimensions
        .create_dimension(client.client_id, "DEPT", "Department")
        .await
        .unwrap();
    let pending = PendingDimensionValue {
        dimension_id: department.id,
        dimension_name: department.name.clone(),
        value_name: "Legacy".into(),
    };
    let legacy = dimensions
        .approve_value(client.client_id, &pending)
        .await
        .unwrap();
    dimension_values::ActiveModel {
        id: Set(legacy.id.into_inner()),
        is_active: Set(false),
        ..Default::default()
    }
    .update(&db)
    .await
    .unwrap();
    assert!(
        !dimensions
            .load_catalog(client.client_id)
            .await
            .unwrap()
            .find_value(department.id, "Legacy")
            .unwrap()
            .is_active
    );

    let approved = dimensions
        .approve_value(client.client_id, &pending)
        .await
        .unwrap();

    assert_eq!(approved.id, legacy.id);
    assert!(approved.is_active);
    let catalog = dimensions.load_catalog(client.client_id).await.unwrap();
    assert!(matches!(
        catalog.resolve("Department", "legacy"),
        TagLookup::Resolved(_)
    ));

    cleanup_client(&db, &client).await;
}

#[tokio::test]
async fn test_consolidated_trial_balance() {
    let Some(db) = connect().await else { return };
    let Ok(client) = setup_client(&db).await else { return };
    let journal = JournalRepository::new(db.clone());
    let reports = ReportRepository::new(db.clone());

    let group_id = ConsolidationGroupId::new();
    consolidation_groups::ActiveModel {
        id: Set(group_id.into_inner()),
        client_id: Set(client.client_id.into_inner()),
        name: Set("Group".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await
    .unwrap();
    for entity_id in [client.hq, client.branch] {
        consolidation_group_members::ActiveModel {
            group_id: Set(group_id.into_inner()),
            entity_id: Set(entity_id.into_inner()),
        }
        .insert(&db)
        .await
        .unwrap();
    }

    journal
        .create_entries(&[
            simple_entry(
                &client,
                client.hq,
                date(2026, 5, 1),
                client.cash,
                client.revenue,
                dec!(400),
                EntryStatus::Posted,
            ),
            simple_entry(
                &client,
                client.branch,
                date(2026, 5, 2),
                client.cash,
                client.revenue,
                dec!(100),
                EntryStatus::Posted,
            ),
        ])
        .await
        .unwrap();

    let report = reports
        .consolidated_trial_balance(client.client_id, group_id, date(2026, 5, 31))
        .await
        .unwrap();
    assert_eq!(report.entities, vec!["BR".to_string(), "HQ".to_string()]);
    let cash = report
        .accounts
        .iter()
        .find(|a| a.balance.account_id == client.cash)
        .expect("cash");
    assert_eq!(cash.balance.balance, dec!(500));
    assert_eq!(cash.by_entity.len(), 2);
    assert!(report.totals.is_balanced);

    let err = reports
        .consolidated_trial_balance(client.client_id, ConsolidationGroupId::new(), date(2026, 5, 31))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportRepositoryError::GroupNotFound(_)));

    cleanup_client(&db, &client).await;
}
