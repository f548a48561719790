/// Events emitted by UI components toward the main loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// The search term changed; restart the debounce window.
    QueryChanged(String),
    /// Search immediately, bypassing the debounce (Enter in the search bar).
    SearchRequested,
    /// Go to and select the entity under the cursor in the result list.
    JumpToSelected,
}
