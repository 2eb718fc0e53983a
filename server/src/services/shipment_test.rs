use super::*;

// =============================================================================
// status enums
// =============================================================================

#[test]
fn shipment_status_round_trips() {
    for status in [
        ShipmentStatus::Pending,
        ShipmentStatus::Assigned,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ] {
        assert_eq!(ShipmentStatus::from_str(status.as_str()), Some(status));
    }
}

#[test]
fn shipment_status_rejects_unknown() {
    assert_eq!(ShipmentStatus::from_str("pending"), None);
    assert_eq!(ShipmentStatus::from_str("Shipped"), None);
    assert_eq!(ShipmentStatus::from_str(""), None);
}

#[test]
fn truck_status_round_trips() {
    for status in [TruckStatus::Available, TruckStatus::OnTrip, TruckStatus::Maintenance] {
        assert_eq!(TruckStatus::from_str(status.as_str()), Some(status));
    }
}

#[test]
fn truck_status_rejects_unknown() {
    assert_eq!(TruckStatus::from_str("Idle"), None);
}

#[test]
fn application_status_round_trips() {
    for status in [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ] {
        assert_eq!(ApplicationStatus::from_str(status.as_str()), Some(status));
    }
}

#[test]
fn application_status_rejects_unknown() {
    assert_eq!(ApplicationStatus::from_str("Declined"), None);
}

// =============================================================================
// accept_application (live DB)
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn live_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        PgPoolOptions::new().connect(&url).await.expect("connect")
    }

    async fn seed_user(pool: &PgPool, role: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, 's$h', $3) RETURNING id",
        )
        .bind(format!("seed-{role}"))
        .bind(format!("{}@test.local", Uuid::new_v4()))
        .bind(role)
        .fetch_one(pool)
        .await
        .expect("seed user")
    }

    async fn seed_truck(pool: &PgPool, owner_id: Uuid) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO trucks (owner_id, plate_number, truck_type, capacity_kg) VALUES ($1, $2, 'flatbed', 1000) RETURNING id",
        )
        .bind(owner_id)
        .bind(Uuid::new_v4().to_string())
        .fetch_one(pool)
        .await
        .expect("seed truck")
    }

    #[tokio::test]
    async fn accept_assigns_shipment_and_rejects_siblings() {
        let pool = live_pool().await;
        let merchant = seed_user(&pool, "Merchant").await;
        let owner = seed_user(&pool, "TruckOwner").await;
        let truck_a = seed_truck(&pool, owner).await;
        let truck_b = seed_truck(&pool, owner).await;

        let shipment = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO shipments (merchant_id, origin, destination, cargo, weight_kg, price)
             VALUES ($1, 'A', 'B', 'steel', 500, 1200) RETURNING id",
        )
        .bind(merchant)
        .fetch_one(&pool)
        .await
        .expect("seed shipment");

        let bid_a = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO shipment_applications (shipment_id, truck_id, bid_amount) VALUES ($1, $2, 1100) RETURNING id",
        )
        .bind(shipment)
        .bind(truck_a)
        .fetch_one(&pool)
        .await
        .expect("seed bid a");
        let bid_b = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO shipment_applications (shipment_id, truck_id, bid_amount) VALUES ($1, $2, 1000) RETURNING id",
        )
        .bind(shipment)
        .bind(truck_b)
        .fetch_one(&pool)
        .await
        .expect("seed bid b");

        accept_application(&pool, bid_a).await.expect("accept");

        let (shipment_status, assigned_truck) =
            sqlx::query_as::<_, (String, Option<Uuid>)>("SELECT status, truck_id FROM shipments WHERE id = $1")
                .bind(shipment)
                .fetch_one(&pool)
                .await
                .expect("shipment row");
        assert_eq!(shipment_status, "Assigned");
        assert_eq!(assigned_truck, Some(truck_a));

        let status_b = sqlx::query_scalar::<_, String>("SELECT status FROM shipment_applications WHERE id = $1")
            .bind(bid_b)
            .fetch_one(&pool)
            .await
            .expect("bid b row");
        assert_eq!(status_b, "Rejected");

        // A second accept on the same shipment must conflict.
        let err = accept_application(&pool, bid_b).await.unwrap_err();
        assert!(matches!(err, ShipmentError::Conflict(_)));
    }

    #[tokio::test]
    async fn accept_unknown_application_is_not_found() {
        let pool = live_pool().await;
        let err = accept_application(&pool, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ShipmentError::NotFound(_)));
    }
}
