// ==========================================
// 设备可靠性分析系统 - 性能统计
// ==========================================
// 职责: 记录编排操作耗时与处理条目数（target = "perf"）
// 开关: MAINT_RELIABILITY_SLOW_OP_MS 配置慢操作阈值（毫秒）
// ==========================================

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

static SLOW_OP_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static ITEM_COUNT: Cell<u64> = Cell::new(0);
}

fn slow_op_threshold_ms() -> u64 {
    *SLOW_OP_THRESHOLD_MS.get_or_init(|| {
        std::env::var("MAINT_RELIABILITY_SLOW_OP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 500 } else { 2000 })
    })
}

/// 在当前活动的 PerfGuard 内累加处理条目数（无活动 Guard 时忽略）
pub fn record_items(count: usize) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if !active {
        return;
    }
    ITEM_COUNT.with(|c| c.set(c.get().saturating_add(count as u64)));
}

/// 性能统计 Guard：记录 elapsed_ms + 处理条目数
///
/// 使用方式：
/// ```ignore
/// let _perf = maint_reliability::perf::PerfGuard::new("analyze");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    items_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let items_start = ITEM_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            items_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let items = ITEM_COUNT
            .with(|c| c.get())
            .saturating_sub(self.items_start);

        tracing::info!(target: "perf", op = self.op, elapsed_ms, items, "done");

        let threshold = slow_op_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(target: "perf", op = self.op, elapsed_ms, threshold, "slow op");
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
