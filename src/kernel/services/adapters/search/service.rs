//! 异步搜索任务
//!
//! 每个查询在 tokio 的 blocking 线程上运行一次完整扫描，通过 `SyncSender`
//! 上报进度与最终结果。

use crate::kernel::search::{
    CancellationToken, Locale, PageResolver, Query, ScanOutcome, SearchIndex,
};
use crate::kernel::services::ports::search::{QueryError, SearchError, SearchMessage, TaskState};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

static SEARCH_ID: AtomicU64 = AtomicU64::new(0);

fn next_search_id() -> u64 {
    SEARCH_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub text: String,
    pub case_sensitive: bool,
    pub exact: bool,
    pub locale: Locale,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case_sensitive: false,
            exact: false,
            locale: Locale::default(),
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

#[derive(Debug)]
struct TaskShared {
    cancel: CancellationToken,
    state: AtomicU8,
    progress: AtomicU8,
}

/// 搜索任务句柄，可在调用方与工作线程之间克隆共享
#[derive(Debug, Clone)]
pub struct SearchTask {
    id: u64,
    shared: Arc<TaskShared>,
}

impl SearchTask {
    pub fn new() -> Self {
        Self {
            id: next_search_id(),
            shared: Arc::new(TaskShared {
                cancel: CancellationToken::new(),
                state: AtomicU8::new(TaskState::Idle.as_u8()),
                progress: AtomicU8::new(0),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// 请求停止：当前上下文匹配完成后生效，任务以 Cancelled 结束
    pub fn request_stop(&self) {
        self.shared.cancel.request();
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn progress(&self) -> u8 {
        self.shared.progress.load(Ordering::Relaxed)
    }

    fn set_state(&self, state: TaskState) {
        self.shared.state.store(state.as_u8(), Ordering::Release);
    }

    fn try_begin(&self) -> bool {
        self.shared
            .state
            .compare_exchange(
                TaskState::Idle.as_u8(),
                TaskState::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn report_progress(&self, percent: u8) {
        self.shared.progress.fetch_max(percent, Ordering::Relaxed);
    }

    fn token(&self) -> &CancellationToken {
        &self.shared.cancel
    }
}

impl Default for SearchTask {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SearchService {
    runtime: tokio::runtime::Handle,
    index: Arc<SearchIndex>,
    pages: Arc<dyn PageResolver>,
}

impl SearchService {
    pub fn new(
        runtime: tokio::runtime::Handle,
        index: Arc<SearchIndex>,
        pages: Arc<dyn PageResolver>,
    ) -> Self {
        Self {
            runtime,
            index,
            pages,
        }
    }

    /// 创建并启动一个新任务
    pub fn start(&self, request: SearchRequest, tx: SyncSender<SearchMessage>) -> SearchTask {
        let task = SearchTask::new();
        self.launch(&task, request, tx);
        task
    }

    /// 启动一个处于 Idle 状态的任务；任务已启动过时返回 false
    pub fn launch(
        &self,
        task: &SearchTask,
        request: SearchRequest,
        tx: SyncSender<SearchMessage>,
    ) -> bool {
        if !task.try_begin() {
            tracing::warn!(search_id = task.id(), state = ?task.state(), "search task already started");
            return false;
        }

        let search_id = task.id();
        let worker_task = task.clone();
        let task = task.clone();
        let index = self.index.clone();
        let pages = self.pages.clone();
        let tx_for_complete = tx.clone();

        tracing::debug!(search_id, query = %request.text, "search started");

        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                run_search(&index, pages.as_ref(), &request, &worker_task, &tx)
            })
            .await;

            let message = match result {
                Ok(Ok(ScanOutcome::Completed(outcome))) => {
                    task.set_state(TaskState::Completed);
                    tracing::debug!(search_id, matches = outcome.match_count, "search complete");
                    SearchMessage::Complete {
                        search_id,
                        match_count: outcome.match_count,
                        results: outcome.results,
                    }
                }
                Ok(Ok(ScanOutcome::Cancelled)) => {
                    task.set_state(TaskState::Cancelled);
                    tracing::debug!(search_id, "search cancelled");
                    SearchMessage::Cancelled { search_id }
                }
                Ok(Err(err)) => {
                    task.set_state(TaskState::Failed);
                    SearchMessage::Failed {
                        search_id,
                        error: SearchError::Query(err),
                    }
                }
                Err(e) => {
                    task.set_state(TaskState::Failed);
                    let reason = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    tracing::error!(search_id, error = %reason, "search worker failed");
                    SearchMessage::Failed {
                        search_id,
                        error: SearchError::TaskFailure(reason),
                    }
                }
            };
            let _ = tx_for_complete.send(message);
        });

        true
    }
}

fn run_search(
    index: &SearchIndex,
    pages: &dyn PageResolver,
    request: &SearchRequest,
    task: &SearchTask,
    tx: &SyncSender<SearchMessage>,
) -> Result<ScanOutcome, QueryError> {
    let query = Query::parse(
        &request.text,
        request.case_sensitive,
        request.exact,
        &request.locale,
    )?;
    let search_id = task.id();
    Ok(index.scan(&query, pages, task.token(), |percent| {
        task.report_progress(percent);
        let _ = tx.send(SearchMessage::Progress { search_id, percent });
    }))
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in search worker".to_string()
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/service.rs"]
mod tests;
