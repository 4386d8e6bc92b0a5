use super::criteria::Criterion;

/// 由生效条件推导缓存键：`{prefix}:{namespace}:{value}`
///
/// 每种条件类别占用独立命名空间，命名空间段本身不含 `:`，
/// 因此不同类别的键即使值相同也不会冲突。
pub fn cache_key(prefix: &str, criterion: &Criterion) -> String {
    format!(
        "{prefix}:{}:{}",
        criterion.kind().namespace(),
        criterion.value()
    )
}
