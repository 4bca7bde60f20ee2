//! ReservationRepository 統合テスト
//!
//! データベースを使用したテスト。`sqlx::test` マクロがテストごとに
//! 使い捨てのデータベースを作成し、マイグレーションを適用する。
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p roomres-infra --test reservation_repository_test
//! ```

mod common;

use common::{alice, bob, hours, setup_test_data, test_now};
use pretty_assertions::assert_eq;
use roomres_domain::{
    reservation::{Reservation, ReservationCriteria, ReservationDraft, ReservationId},
    resource::ResourceId,
};
use roomres_infra::repository::{PostgresReservationRepository, ReservationRepository};
use sqlx::PgPool;

fn ids(reservations: &[Reservation]) -> Vec<i32> {
    reservations.iter().map(|r| r.id().as_i32()).collect()
}

async fn save(
    sut: &PostgresReservationRepository,
    draft: ReservationDraft,
) -> Reservation {
    sut.save(draft).await.expect("保存に失敗")
}

// =============================================================================
// save / find_by_id
// =============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_保存した予約をidで取得できる(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let saved = save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;
    let found = sut.find_by_id(saved.id()).await.unwrap();

    assert_eq!(found, Some(saved));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないidはnoneを返す(pool: PgPool) {
    setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let found = sut.find_by_id(ReservationId::new(9999)).await.unwrap();

    assert_eq!(found, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_idありの保存は既存の予約を置き換える(pool: PgPool) {
    let (room, other_room) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    let saved = save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;

    let replaced = save(
        &sut,
        ReservationDraft::new(alice(), other_room, hours(3), hours(4)).with_id(saved.id()),
    )
    .await;

    assert_eq!(replaced.id(), saved.id());
    assert_eq!(replaced.resource_id(), other_room);
    assert_eq!(sut.find_all().await.unwrap(), vec![replaced]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないidでの保存は新しいidで作成される(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let saved = save(
        &sut,
        ReservationDraft::new(alice(), room, hours(1), hours(2)).with_id(ReservationId::new(500)),
    )
    .await;

    assert_ne!(saved.id(), ReservationId::new(500));
    assert_eq!(sut.find_all().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_開始が終了以降の予約は制約違反になる(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let err = sut
        .save(ReservationDraft::new(alice(), room, hours(2), hours(2)))
        .await
        .unwrap_err();

    assert_eq!(
        err.violated_constraint(),
        Some("reservations_time_window_check")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないリソースへの予約は外部キー制約違反になる(pool: PgPool) {
    setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let err = sut
        .save(ReservationDraft::new(
            alice(),
            ResourceId::new(9999),
            hours(1),
            hours(2),
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err.violated_constraint(),
        Some("reservations_resource_id_fkey")
    );
}

// =============================================================================
// cancel
// =============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_キャンセルは1回目に1を返し2回目に0を返す(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    let saved = save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;

    assert_eq!(sut.cancel(saved.id()).await.unwrap(), 1);
    assert_eq!(sut.cancel(saved.id()).await.unwrap(), 0);

    let found = sut.find_by_id(saved.id()).await.unwrap().unwrap();
    assert!(found.is_cancelled());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しない予約のキャンセルは0を返す(pool: PgPool) {
    setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    assert_eq!(sut.cancel(ReservationId::new(9999)).await.unwrap(), 0);
}

// =============================================================================
// ユーザー別一覧
// =============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_ユーザー別の今後と過去はキャンセル済みを除き互いに素(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    let past_old = save(&sut, ReservationDraft::new(alice(), room, hours(-10), hours(-9))).await;
    let past_new = save(&sut, ReservationDraft::new(alice(), room, hours(-4), hours(-3))).await;
    let ongoing = save(&sut, ReservationDraft::new(alice(), room, hours(-1), hours(1))).await;
    let later = save(&sut, ReservationDraft::new(alice(), room, hours(5), hours(6))).await;
    let sooner = save(&sut, ReservationDraft::new(alice(), room, hours(2), hours(3))).await;
    let cancelled = save(&sut, ReservationDraft::new(alice(), room, hours(7), hours(8))).await;
    sut.cancel(cancelled.id()).await.unwrap();
    save(&sut, ReservationDraft::new(bob(), room, hours(9), hours(10))).await;

    let upcoming = sut.find_upcoming_by_user_id(&alice(), test_now()).await.unwrap();
    let past = sut.find_past_by_user_id(&alice(), test_now()).await.unwrap();
    let all = sut.find_by_user_id(&alice()).await.unwrap();

    assert_eq!(ids(&upcoming), ids(&[sooner, later]));
    assert_eq!(ids(&past), ids(&[past_new, past_old]));
    assert_eq!(all.len(), 6);
    assert!(all.iter().any(|r| r.id() == ongoing.id()));
    assert!(all.iter().any(|r| r.id() == cancelled.id()));
}

// =============================================================================
// find_resource_ids_in_window
// =============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_時間帯に厳密に含まれる予約のリソースidのみ返す(pool: PgPool) {
    let (room_a, room_b) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);

    // 含まれる（重複は 1 件にまとまる）
    save(&sut, ReservationDraft::new(alice(), room_b, hours(1), hours(2))).await;
    save(&sut, ReservationDraft::new(bob(), room_b, hours(3), hours(4))).await;
    save(&sut, ReservationDraft::new(alice(), room_a, hours(2), hours(3))).await;
    // 境界と一致
    save(&sut, ReservationDraft::new(alice(), room_a, hours(0), hours(2))).await;
    // はみ出す
    save(&sut, ReservationDraft::new(alice(), room_a, hours(9), hours(11))).await;

    let result = sut
        .find_resource_ids_in_window(hours(0), hours(10))
        .await
        .unwrap();

    let mut expected = vec![room_a, room_b];
    expected.sort();
    assert_eq!(result, expected);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_キャンセル済みの予約は時間帯検索に含まれない(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    let saved = save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;
    sut.cancel(saved.id()).await.unwrap();

    let result = sut
        .find_resource_ids_in_window(hours(0), hours(10))
        .await
        .unwrap();

    assert_eq!(result, Vec::<ResourceId>::new());
}

// =============================================================================
// find_by_criteria / find_all
// =============================================================================

#[sqlx::test(migrations = "../../migrations")]
async fn test_検索条件は指定フィールドのandで絞り込む(pool: PgPool) {
    let (room_a, room_b) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    let target = save(&sut, ReservationDraft::new(alice(), room_a, hours(1), hours(2))).await;
    save(&sut, ReservationDraft::new(alice(), room_b, hours(1), hours(2))).await;
    save(&sut, ReservationDraft::new(bob(), room_a, hours(1), hours(2))).await;

    let criteria = ReservationCriteria::new()
        .user_id(alice())
        .resource_id(room_a)
        .start_time(hours(1));
    let result = sut.find_by_criteria(&criteria).await.unwrap();

    assert_eq!(result, vec![target]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_空の検索条件は全件と一致する(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;
    save(&sut, ReservationDraft::new(bob(), room, hours(3), hours(4))).await;

    let by_criteria = sut
        .find_by_criteria(&ReservationCriteria::new())
        .await
        .unwrap();
    let all = sut.find_all().await.unwrap();

    assert_eq!(by_criteria, all);
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ユーザーidのみの検索条件はユーザー別一覧と一致する(pool: PgPool) {
    let (room, _) = setup_test_data(&pool).await;
    let sut = PostgresReservationRepository::new(pool);
    save(&sut, ReservationDraft::new(alice(), room, hours(1), hours(2))).await;
    let cancelled = save(&sut, ReservationDraft::new(alice(), room, hours(3), hours(4))).await;
    sut.cancel(cancelled.id()).await.unwrap();
    save(&sut, ReservationDraft::new(bob(), room, hours(5), hours(6))).await;

    let by_criteria = sut
        .find_by_criteria(&ReservationCriteria::new().user_id(alice()))
        .await
        .unwrap();
    let by_user = sut.find_by_user_id(&alice()).await.unwrap();

    assert_eq!(by_criteria, by_user);
}
