/// Read-through caching around an async lookup.
///
/// `$cache` is an `Option<Cache>`. With no cache configured the block just
/// runs. Otherwise a hit is returned directly and a miss runs the block and
/// stores its value for `$ttl` seconds.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Details { id, language }, DETAILS_TTL, async move {
///     fetch_details(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match &$cache {
            Some(cache) => match cache.get(&key).await {
                Some(hit) => Ok(hit),
                None => {
                    let value = $block.await?;
                    cache.put(&key, &value, $ttl).await;
                    Ok(value)
                }
            },
            None => $block.await,
        }
    }};
}
