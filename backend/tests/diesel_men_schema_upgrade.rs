//! Schema provisioning against a `men` table created outside the service.
//!
//! Rebuilds the `men` table, so it lives in its own test binary and must
//! point at a disposable database. Set `MEN_TEST_DATABASE_URL` to run it.

use diesel_async::RunQueryDsl;
use men_service::domain::Person;
use men_service::domain::ports::MenRepository;
use men_service::outbound::persistence::{DbPool, DieselMenRepository, PoolConfig};
use rstest::rstest;

mod support;

use support::test_database_url;

async fn execute(pool: &DbPool, sql: &str) {
    let mut conn = pool.get().await.expect("connection");
    diesel::sql_query(sql)
        .execute(&mut conn)
        .await
        .expect("statement succeeds");
}

async fn assert_insert_round_trips(pool: &DbPool) {
    let repository = DieselMenRepository::new(pool.clone());
    repository.ensure_schema().await.expect("schema ensured");

    let ada = Person::new("Ada", "UK");
    let id = repository.create(&ada).await.expect("insert decodes its id");
    assert_eq!(repository.find_by_id(id).await.expect("find"), Some(ada));
    assert_eq!(repository.list().await.expect("list").len(), 1);
}

/// Both legacy shapes share the one `men` table, so they run in sequence.
#[rstest]
#[tokio::test]
async fn legacy_tables_are_brought_up_to_shape() {
    let Some(url) = test_database_url() else {
        return;
    };
    let pool = DbPool::connect(PoolConfig::new(url))
        .await
        .expect("database reachable");

    execute(&pool, "DROP TABLE IF EXISTS men").await;
    execute(&pool, "CREATE TABLE men (name TEXT, country TEXT)").await;
    assert_insert_round_trips(&pool).await;

    execute(&pool, "DROP TABLE men").await;
    execute(
        &pool,
        "CREATE TABLE men (id SERIAL PRIMARY KEY, name TEXT, country TEXT)",
    )
    .await;
    assert_insert_round_trips(&pool).await;
}
