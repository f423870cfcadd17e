//! Local list state with optimistic mutations.
//!
//! # Design
//! `TodoController` mirrors the server's list and applies each user action
//! locally before the server confirms it. Every operation is split like the
//! client: `begin_*` applies the optimistic change and returns a
//! `PendingRequest`, and `settle` consumes the transport outcome to either
//! reconcile with the server's record or roll back. The convenience drivers
//! (`refresh`, `add`, `toggle`, `delete`, `update_title`) run both halves
//! around a `Transport`.
//!
//! Rollback restores the snapshot captured in `begin_*` as a single
//! replace, never a partial patch. That is only sound while the snapshot is
//! the latest confirmed list, so at most one mutation is in flight: any
//! `begin_*` mutation issued while `mutating()` is true is dropped. A
//! refresh that lands while a mutation is pending supersedes its snapshot;
//! a later failure of that mutation keeps the refreshed list.

use log::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Counts, CreateTodo, Filter, Todo, TodoId, UpdateTodo};

/// A request issued by `begin_*`, waiting to be settled.
#[derive(Debug)]
#[must_use = "a pending request must be passed back to `TodoController::settle`"]
pub struct PendingRequest {
    request: HttpRequest,
    op: Op,
}

impl PendingRequest {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// The id this request mutates, if any.
    pub fn target(&self) -> Option<TodoId> {
        match &self.op {
            Op::Refresh | Op::Add => None,
            Op::Toggle { id, .. } | Op::Delete { id, .. } | Op::UpdateTitle { id, .. } => Some(*id),
        }
    }
}

#[derive(Debug)]
enum Op {
    Refresh,
    Add,
    Toggle { id: TodoId, snapshot: Snapshot },
    Delete { id: TodoId, snapshot: Snapshot },
    UpdateTitle { id: TodoId, snapshot: Snapshot },
}

/// The list as it was before an optimistic change, tagged with the refresh
/// it descends from.
#[derive(Debug)]
struct Snapshot {
    todos: Vec<Todo>,
    generation: u64,
}

/// In-memory view state for one todo list.
#[derive(Debug, Clone)]
pub struct TodoController {
    client: TodoClient,
    todos: Vec<Todo>,
    filter: Filter,
    loading: bool,
    error: Option<String>,
    draft: String,
    mutating: bool,
    pending_id: Option<TodoId>,
    generation: u64,
}

impl TodoController {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            filter: Filter::default(),
            loading: false,
            error: None,
            draft: String::new(),
            mutating: false,
            pending_id: None,
            generation: 0,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True while an add/toggle/delete/edit is awaiting its response. No
    /// other mutation can begin until it settles.
    pub fn mutating(&self) -> bool {
        self.mutating
    }

    pub fn is_pending(&self, id: TodoId) -> bool {
        self.pending_id == Some(id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn filtered_todos(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| self.filter.matches(todo)).collect()
    }

    pub fn counts(&self) -> Counts {
        let completed = self.todos.iter().filter(|todo| todo.completed).count();
        Counts {
            total: self.todos.len(),
            active: self.todos.len() - completed,
            completed,
        }
    }

    // -----------------------------------------------------------------------
    // begin_* : optimistic half
    // -----------------------------------------------------------------------

    pub fn begin_refresh(&mut self) -> PendingRequest {
        self.loading = true;
        self.error = None;
        PendingRequest {
            request: self.client.build_list_todos(),
            op: Op::Refresh,
        }
    }

    /// Create a todo from the trimmed draft. Nothing is inserted until the
    /// server answers. Returns `None` for a blank draft or while another
    /// mutation is pending.
    pub fn begin_add(&mut self) -> Option<PendingRequest> {
        if self.mutating {
            warn!("ignoring add: another mutation is still pending");
            return None;
        }
        let title = self.draft.trim();
        if title.is_empty() {
            return None;
        }
        let input = CreateTodo {
            title: title.to_string(),
            completed: false,
        };
        let request = match self.client.build_create_todo(&input) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };
        self.start_mutation(None);
        Some(PendingRequest { request, op: Op::Add })
    }

    /// Flip `completed` locally and request the server-side toggle.
    pub fn begin_toggle(&mut self, id: TodoId) -> Option<PendingRequest> {
        let index = self.claim(id)?;
        let snapshot = self.snapshot();
        self.todos[index].completed = !self.todos[index].completed;
        self.start_mutation(Some(id));
        Some(PendingRequest {
            request: self.client.build_toggle_todo(id),
            op: Op::Toggle { id, snapshot },
        })
    }

    /// Remove the todo locally and request its deletion.
    pub fn begin_delete(&mut self, id: TodoId) -> Option<PendingRequest> {
        let index = self.claim(id)?;
        let snapshot = self.snapshot();
        self.todos.remove(index);
        self.start_mutation(Some(id));
        Some(PendingRequest {
            request: self.client.build_delete_todo(id),
            op: Op::Delete { id, snapshot },
        })
    }

    /// Rewrite the title locally, keeping `completed`, and request a full
    /// replace. Returns `None` for a blank title or an unknown id.
    pub fn begin_update_title(&mut self, id: TodoId, title: &str) -> Option<PendingRequest> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let index = self.claim(id)?;
        let input = UpdateTodo {
            title: title.to_string(),
            completed: self.todos[index].completed,
        };
        let request = match self.client.build_update_todo(id, &input) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.to_string());
                return None;
            }
        };
        let snapshot = self.snapshot();
        self.todos[index].title = input.title;
        self.start_mutation(Some(id));
        Some(PendingRequest {
            request,
            op: Op::UpdateTitle { id, snapshot },
        })
    }

    // -----------------------------------------------------------------------
    // settle : reconcile or roll back
    // -----------------------------------------------------------------------

    /// Apply the outcome of a pending request. On failure the error message
    /// is stored and also returned.
    pub fn settle(
        &mut self,
        pending: PendingRequest,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<(), ApiError> {
        match pending.op {
            Op::Refresh => {
                self.loading = false;
                let page = outcome.and_then(|response| self.client.parse_list_todos(response));
                match page {
                    Ok(page) => {
                        debug!("refreshed {} todos (server total {})", page.items.len(), page.total);
                        self.todos = page.items;
                        self.generation += 1;
                        Ok(())
                    }
                    Err(err) => self.fail(err),
                }
            }
            Op::Add => {
                self.finish_mutation();
                let created = outcome.and_then(|response| self.client.parse_create_todo(response));
                match created {
                    Ok(todo) => {
                        debug!("created todo {}", todo.id);
                        self.todos.retain(|existing| existing.id != todo.id);
                        self.todos.insert(0, todo);
                        self.draft.clear();
                        Ok(())
                    }
                    Err(err) => self.fail(err),
                }
            }
            Op::Toggle { id, snapshot } => {
                self.finish_mutation();
                let toggled = outcome.and_then(|response| self.client.parse_toggle_todo(response));
                match toggled {
                    Ok(todo) => {
                        self.reconcile(todo);
                        Ok(())
                    }
                    Err(err) => self.roll_back(id, snapshot, err),
                }
            }
            Op::Delete { id, snapshot } => {
                self.finish_mutation();
                let deleted = outcome.and_then(|response| self.client.parse_delete_todo(response));
                match deleted {
                    Ok(()) => {
                        debug!("deleted todo {id}");
                        Ok(())
                    }
                    Err(err) => self.roll_back(id, snapshot, err),
                }
            }
            Op::UpdateTitle { id, snapshot } => {
                self.finish_mutation();
                let updated = outcome.and_then(|response| self.client.parse_update_todo(response));
                match updated {
                    Ok(todo) => {
                        self.reconcile(todo);
                        Ok(())
                    }
                    Err(err) => self.roll_back(id, snapshot, err),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Drivers
    // -----------------------------------------------------------------------

    pub fn refresh<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        let pending = self.begin_refresh();
        self.run(transport, pending)
    }

    pub fn add<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        match self.begin_add() {
            Some(pending) => self.run(transport, pending),
            None => Ok(()),
        }
    }

    pub fn toggle<T: Transport>(&mut self, transport: &T, id: TodoId) -> Result<(), ApiError> {
        match self.begin_toggle(id) {
            Some(pending) => self.run(transport, pending),
            None => Ok(()),
        }
    }

    pub fn delete<T: Transport>(&mut self, transport: &T, id: TodoId) -> Result<(), ApiError> {
        match self.begin_delete(id) {
            Some(pending) => self.run(transport, pending),
            None => Ok(()),
        }
    }

    /// Returns the error on failure so an inline editor can stay open.
    pub fn update_title<T: Transport>(
        &mut self,
        transport: &T,
        id: TodoId,
        title: &str,
    ) -> Result<(), ApiError> {
        match self.begin_update_title(id, title) {
            Some(pending) => self.run(transport, pending),
            None => Ok(()),
        }
    }

    fn run<T: Transport>(&mut self, transport: &T, pending: PendingRequest) -> Result<(), ApiError> {
        debug!("{} {}", pending.request.method, pending.request.path);
        let outcome = transport.execute(pending.request.clone());
        self.settle(pending, outcome)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Index of `id` if it is present and no mutation is in flight.
    fn claim(&self, id: TodoId) -> Option<usize> {
        if self.mutating {
            warn!("ignoring mutation of todo {id}: another mutation is still pending");
            return None;
        }
        let index = self.todos.iter().position(|todo| todo.id == id);
        if index.is_none() {
            debug!("ignoring mutation of unknown todo {id}");
        }
        index
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            todos: self.todos.clone(),
            generation: self.generation,
        }
    }

    fn start_mutation(&mut self, id: Option<TodoId>) {
        self.mutating = true;
        self.pending_id = id;
        self.error = None;
    }

    fn finish_mutation(&mut self) {
        self.mutating = false;
        self.pending_id = None;
    }

    fn reconcile(&mut self, todo: Todo) {
        if let Some(existing) = self.todos.iter_mut().find(|existing| existing.id == todo.id) {
            *existing = todo;
        }
    }

    fn roll_back(&mut self, id: TodoId, snapshot: Snapshot, err: ApiError) -> Result<(), ApiError> {
        if snapshot.generation == self.generation {
            warn!("rolling back todo {id}: {err}");
            self.todos = snapshot.todos;
        } else {
            warn!("todo {id} failed after a refresh; keeping the refreshed list: {err}");
        }
        self.fail(err)
    }

    fn fail(&mut self, err: ApiError) -> Result<(), ApiError> {
        self.error = Some(err.to_string());
        Err(err)
    }
}
