// ==========================================
// 设备可靠性分析系统 - 数值工具
// ==========================================
// 职责: 均值/总体标准差、Simpson 积分、黄金分割搜索
// ==========================================

/// 黄金分割比的倒数 (sqrt(5) - 1) / 2
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// 算术平均; 空切片返回 None
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 总体标准差（除以 n）; 空切片返回 None
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// 复合 Simpson 积分,panels 自动取偶数
pub fn simpson<F>(f: F, a: f64, b: f64, panels: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if b <= a {
        return 0.0;
    }
    let n = panels.max(2);
    let n = n + n % 2;
    let h = (b - a) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + h * i as f64)
        })
        .sum();
    (f(a) + interior + f(b)) * h / 3.0
}

/// 黄金分割搜索单峰函数在 [lo, hi] 上的极小值
///
/// # 返回
/// (x*, f(x*))
pub fn golden_section_min<F>(f: F, lo: f64, hi: f64, tolerance: f64, max_iter: usize) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lo, hi);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..max_iter {
        if (b - a).abs() <= tolerance {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }

    let x = (a + b) / 2.0;
    (x, f(x))
}
