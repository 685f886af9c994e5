use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

/// Инициализация логирования для бинарных потребителей движка
///
/// Фильтр берётся из RUST_LOG, по умолчанию "info". Повторные вызовы
/// безопасны и ничего не делают.
pub fn init() {
    INIT.get_or_init(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
