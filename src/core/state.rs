use std::fmt;

/// 單次查詢的狀態；Failed 為吸收狀態，不會回頭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Start,
    FetchingIp,
    FetchingCoords,
    FetchingPasses,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Start => "start",
            PipelineState::FetchingIp => "fetching_ip",
            PipelineState::FetchingCoords => "fetching_coords",
            PipelineState::FetchingPasses => "fetching_passes",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// 成功路徑的下一個狀態；終止狀態維持不變
    pub fn advance(self) -> Self {
        match self {
            PipelineState::Start => PipelineState::FetchingIp,
            PipelineState::FetchingIp => PipelineState::FetchingCoords,
            PipelineState::FetchingCoords => PipelineState::FetchingPasses,
            PipelineState::FetchingPasses => PipelineState::Done,
            PipelineState::Done => PipelineState::Done,
            PipelineState::Failed => PipelineState::Failed,
        }
    }

    /// 終止狀態不再改變
    pub fn fail(self) -> Self {
        if self.is_terminal() {
            self
        } else {
            PipelineState::Failed
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
