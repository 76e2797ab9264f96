/// Wall-clock milliseconds, used to seed patterns when no seed is given.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    // Page origin plus elapsed gives epoch time without pulling in js-sys
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_advances() {
        let first = now_millis();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(now_millis() > first);
    }
}
