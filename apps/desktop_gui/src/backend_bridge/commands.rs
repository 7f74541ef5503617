//! Backend commands queued from UI to the backend worker.

pub enum BackendCommand {
    Ask { query: String },
    CancelAsk,
}
