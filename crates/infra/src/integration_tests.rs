//! Integration tests for the full intake pipeline.
//!
//! Tests: Submit → validation → pricing → Repository → Query
//!
//! Verifies:
//! - Rule violations abort the whole batch and store nothing
//! - Defaults and discount tiers end up in the stored orders
//! - Each query filter selects the right orders

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
    use rust_decimal::Decimal;

    use pedidos_orders::{OrderDraft, OrderError};

    use crate::intake::{IntakeError, OrderIntake};
    use crate::repository::{InMemoryOrderRepository, OrderRepository};

    fn setup() -> (OrderIntake<Arc<InMemoryOrderRepository>>, Arc<InMemoryOrderRepository>) {
        let repo = Arc::new(InMemoryOrderRepository::new());
        (OrderIntake::new(repo.clone()), repo)
    }

    fn draft(control_number: &str, unit_price: i64, quantity: Option<i32>) -> OrderDraft {
        OrderDraft {
            control_number: control_number.to_string(),
            registered_at: None,
            customer_name: "Ana".to_string(),
            unit_price: Decimal::new(unit_price, 0),
            quantity,
            customer_code: 5,
        }
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn registered(control_number: &str, when: NaiveDateTime) -> OrderDraft {
        OrderDraft {
            registered_at: Some(when),
            ..draft(control_number, 10, Some(1))
        }
    }

    #[tokio::test]
    async fn saves_batch_and_assigns_ids() {
        let (intake, repo) = setup();

        let saved = intake
            .submit(vec![draft("1", 100, Some(5)), draft("2", 50, Some(2))])
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].control_number().as_str(), "1");
        assert_eq!(saved[1].control_number().as_str(), "2");
        assert!(saved[0].id_typed() < saved[1].id_typed());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn invalid_customer_code_stores_nothing() {
        for code in [-1, 0, 11, 1_000] {
            let (intake, repo) = setup();
            let mut bad = draft("bad", 100, Some(1));
            bad.customer_code = code;

            let err = intake
                .submit(vec![draft("ok", 100, Some(1)), bad])
                .await
                .unwrap_err();

            assert!(
                matches!(err, IntakeError::Order(OrderError::InvalidCustomerCode(c)) if c == code),
                "code {code} gave {err:?}"
            );
            assert!(repo.is_empty());
        }
    }

    #[tokio::test]
    async fn stored_control_number_rejects_whole_batch() {
        let (intake, repo) = setup();
        intake.submit(vec![draft("123", 100, Some(1))]).await.unwrap();

        let err = intake
            .submit(vec![draft("456", 100, Some(1)), draft("123", 100, Some(1))])
            .await
            .unwrap_err();

        assert!(matches!(err, IntakeError::DuplicateControlNumber(n) if n == "123"));
        assert_eq!(repo.len(), 1);
        assert!(repo.find_by_control_number("456").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_within_batch_stores_nothing() {
        let (intake, repo) = setup();

        let err = intake
            .submit(vec![draft("777", 100, Some(1)), draft("777", 100, Some(2))])
            .await
            .unwrap_err();

        assert!(matches!(err, IntakeError::DuplicateControlNumber(n) if n == "777"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn missing_registration_time_defaults_to_now() {
        let (intake, _repo) = setup();

        let before = Utc::now().naive_utc().trunc_subsecs(6);
        let saved = intake.submit(vec![draft("124", 200, Some(2))]).await.unwrap();
        let after = Utc::now().naive_utc();

        let registered_at = saved[0].registered_at();
        assert!(registered_at >= before && registered_at <= after);
    }

    #[tokio::test]
    async fn missing_quantity_defaults_to_one() {
        let (intake, _repo) = setup();

        let saved = intake.submit(vec![draft("125", 300, None)]).await.unwrap();

        assert_eq!(saved[0].quantity(), 1);
        assert_eq!(saved[0].total_price(), Decimal::new(300, 0));
    }

    #[tokio::test]
    async fn prices_by_discount_tier() {
        let (intake, _repo) = setup();

        let saved = intake
            .submit(vec![
                draft("q10", 100, Some(10)),
                draft("q7", 100, Some(7)),
                draft("q3", 100, Some(3)),
            ])
            .await
            .unwrap();

        let totals: Vec<Decimal> = saved.iter().map(|o| o.total_price()).collect();
        assert_eq!(
            totals,
            vec![Decimal::new(90000, 2), Decimal::new(66500, 2), Decimal::new(30000, 2)]
        );
        assert!(saved.iter().all(|o| o.unit_price() == Decimal::new(100, 0)));
    }

    #[tokio::test]
    async fn query_by_control_number_ignores_date() {
        let (intake, _repo) = setup();
        intake
            .submit(vec![
                registered("123", at(10, 9, 0, 0)),
                registered("999", at(11, 9, 0, 0)),
            ])
            .await
            .unwrap();

        let other_day = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let found = intake
            .search(Some("123".to_string()), Some(other_day))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].control_number().as_str(), "123");

        let missing = intake.search(Some("nope".to_string()), None).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn query_by_date_covers_the_whole_day() {
        let (intake, _repo) = setup();
        intake
            .submit(vec![
                registered("before", at(9, 23, 59, 59)),
                registered("midnight", at(10, 0, 0, 0)),
                registered("noon", at(10, 12, 0, 0)),
                registered("last", at(10, 23, 59, 59)),
                registered("after", at(11, 0, 0, 0)),
            ])
            .await
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let found = intake.search(None, Some(day)).await.unwrap();

        let numbers: Vec<&str> = found.iter().map(|o| o.control_number().as_str()).collect();
        assert_eq!(numbers, vec!["midnight", "noon", "last"]);
    }

    #[tokio::test]
    async fn query_without_filters_lists_everything() {
        let (intake, _repo) = setup();
        intake
            .submit(vec![draft("a", 1, None), draft("b", 1, None)])
            .await
            .unwrap();
        intake.submit(vec![draft("c", 1, None)]).await.unwrap();

        let all = intake.search(None, None).await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|o| o.control_number().as_str()).collect();
        assert_eq!(numbers, vec!["a", "b", "c"]);
    }
}
