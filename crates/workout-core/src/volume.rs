use std::time::Duration;

/// Training volume of something that can be performed
pub trait Volume {
    /// Short human readable summary, e.g. "3 x 10" or "400m"
    fn describe_volume(&self) -> String;

    /// Rough wall-clock estimate, `None` when nothing in it is measurable
    fn estimate_duration(&self) -> Option<Duration>;
}

/// Sum the estimates of `items`, skipping the ones that cannot be estimated.
///
/// Returns `None` only if no item has an estimate.
pub(crate) fn sum_estimates<'a, T, I>(items: I) -> Option<Duration>
where
    T: Volume + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter_map(|item| item.estimate_duration())
        .fold(None, |acc, d| Some(acc.unwrap_or_default() + d))
}
