pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod stores;

pub use error::GatewayError;
pub use gateway::{
    CallLog, EngineWarmer, GatewayCall, LifecycleDependencies, LoadUrlOrSearch, Navigator,
    RecordingGateway, UseCaseGateway,
};
pub use orchestrator::{SearchOrchestrator, SessionDependencies};
pub use reducer::{reduce, Effect, LoadUrlRequest, ProviderRebuild, SessionEvent, StoreSnapshot};
pub use runtime::SearchSession;
pub use state::{SessionPhase, SessionState};
pub use stores::{
    BrowserAction, BrowserChange, BrowserStore, InMemoryBrowserStore, InMemoryToolbarStore,
    ToolbarAction, ToolbarChange, ToolbarStore,
};
