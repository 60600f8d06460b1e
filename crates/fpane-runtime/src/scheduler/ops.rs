#![forbid(unsafe_code)]

//! Per-pane public operations.
//!
//! Each operation resolves its parameters against the pane's settings,
//! then submits. The callback form takes `FnOnce(bool)`; the `_async` form
//! returns a [`Completion`].

use fpane_core::{PaneError, PaneId};

use crate::args::{
    LoadArgs, LoadParams, MoveParams, OperationArgs, ResizeParams, ShowParams, resolve_show,
};
use crate::completion::Completion;

use super::PaneManager;

impl PaneManager {
    fn submit_with(
        &mut self,
        id: PaneId,
        args: OperationArgs,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        self.submit(&id, args, Some(Box::new(on_done))).map(|_| ())
    }

    fn submit_async(&mut self, id: PaneId, args: OperationArgs) -> Result<Completion, PaneError> {
        let completion = Completion::new();
        self.submit(&id, args, Some(completion.callback()))?;
        Ok(completion)
    }

    fn show_args(&self, id: &PaneId, params: ShowParams) -> Result<OperationArgs, PaneError> {
        let record = self.record(id)?;
        Ok(OperationArgs::Show(resolve_show(&record.settings.show, params)))
    }

    fn load_args(&self, id: &PaneId, params: &LoadParams) -> Result<OperationArgs, PaneError> {
        let record = self.record(id)?;
        Ok(OperationArgs::Load(LoadArgs::resolve(
            record.settings.load.as_ref(),
            params,
        )))
    }

    /// Show a pane, loading and initializing it first when needed.
    pub fn show(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: impl Into<ShowParams>,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        let args = self.show_args(&id, params.into())?;
        self.submit_with(id, args, on_done)
    }

    pub fn show_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: impl Into<ShowParams>,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        let args = self.show_args(&id, params.into())?;
        self.submit_async(id, args)
    }

    /// Hide a pane. Unloads it afterwards if its settings say so.
    pub fn hide(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        self.submit_with(id, OperationArgs::Hide, on_done)
    }

    pub fn hide_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        self.submit_async(id, OperationArgs::Hide)
    }

    /// Load a pane's content without showing it.
    ///
    /// [`LoadParams::Reload`] replaces loaded content, re-showing the pane if
    /// it was visible.
    pub fn load(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: LoadParams,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        let args = self.load_args(&id, &params)?;
        self.submit_with(id, args, on_done)
    }

    pub fn load_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: LoadParams,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        let args = self.load_args(&id, &params)?;
        self.submit_async(id, args)
    }

    /// Remove a pane's content from the document, hiding it first.
    pub fn unload(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        self.submit_with(id, OperationArgs::Unload, on_done)
    }

    pub fn unload_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        self.submit_async(id, OperationArgs::Unload)
    }

    /// Move a visible (or showing) pane.
    ///
    /// # Errors
    ///
    /// `NotVisible` when the pane is neither visible nor being shown,
    /// `IllegalState` while it is hiding or unloading.
    pub fn move_pane(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: MoveParams,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        self.submit_with(id, OperationArgs::Move(params), on_done)
    }

    pub fn move_pane_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: MoveParams,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        self.submit_async(id, OperationArgs::Move(params))
    }

    /// Resize a visible (or showing) pane within its resize limits.
    ///
    /// # Errors
    ///
    /// Same as [`move_pane`](Self::move_pane).
    pub fn resize(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: ResizeParams,
        on_done: impl FnOnce(bool) + 'static,
    ) -> Result<(), PaneError> {
        let id = id.try_into()?;
        self.submit_with(id, OperationArgs::Resize(params), on_done)
    }

    pub fn resize_async(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        params: ResizeParams,
    ) -> Result<Completion, PaneError> {
        let id = id.try_into()?;
        self.submit_async(id, OperationArgs::Resize(params))
    }
}
