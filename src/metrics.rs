#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetrics {
    pub page_number: usize,
    pub command_count: usize,
    pub text_run_count: usize,
    pub content_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetrics {
    pub pages: Vec<PageMetrics>,
    pub total_bytes: usize,
    /// Characters replaced with `?` because WinAnsi has no code for them.
    pub substituted_chars: usize,
}
