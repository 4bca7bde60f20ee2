//! # Reservation Service サーバー
//!
//! 予約の参照・保存・キャンセルと予約確認メールの送信依頼を提供する内部 API サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `RESERVATION_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `RESERVATION_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `NOTIFICATION_BACKEND` | No | `http` または `noop`（デフォルト: `http`） |
//! | `EMAIL_SERVICE_URL` | No | メールサービスのベース URL（デフォルト: `http://localhost:8080`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,roomres=debug`） |

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use roomres_domain::clock::SystemClock;
use roomres_infra::{
    db,
    notification::{HttpNotificationSender, NoopNotificationSender, NotificationSender},
    repository::{PostgresReservationRepository, PostgresResourceRepository, PostgresUserRepository},
};
use roomres_reservation_service::{
    config::{NotificationBackend, NotificationConfig, ReservationConfig},
    handler::ReservationState,
    router,
    usecase::ReservationUseCaseImpl,
};
use roomres_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("reservation-service"));
    let _tracing_guard = tracing::info_span!("app", service = "reservation-service").entered();

    let config = ReservationConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Reservation Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let usecase = ReservationUseCaseImpl::new(
        Arc::new(PostgresReservationRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresResourceRepository::new(pool)),
        notification_sender(&config.notification),
        Arc::new(SystemClock),
    );
    let state = Arc::new(ReservationState { usecase });

    let app = router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Reservation Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn notification_sender(config: &NotificationConfig) -> Arc<dyn NotificationSender> {
    match config.backend {
        NotificationBackend::Http => {
            tracing::info!(
                email_service_url = %config.email_service_url,
                "通知バックエンド: http"
            );
            Arc::new(HttpNotificationSender::new(&config.email_service_url))
        }
        NotificationBackend::Noop => {
            tracing::info!("通知バックエンド: noop");
            Arc::new(NoopNotificationSender)
        }
    }
}
