use std::sync::Arc;

use bitewise_core::application::BitewiseService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: BitewiseService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: BitewiseService) -> Self {
        Self { args, service }
    }
}
