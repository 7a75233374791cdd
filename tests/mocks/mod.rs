//! Test doubles for the model and search seams.

mod mock_language_model;
mod mock_web_search;

#[allow(unused_imports)]
pub use mock_language_model::MockLanguageModel;
#[allow(unused_imports)]
pub use mock_web_search::MockWebSearch;
