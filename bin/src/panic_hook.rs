/// Prints panics on a single line and points users to the issue tracker.
pub fn set() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| info.to_string());

        match info.location() {
            Some(loc) => eprintln!("Panic: {msg:?} at {}:{}", loc.file(), loc.line()),
            None => eprintln!("Panic: {msg:?}"),
        }

        eprintln!("This is a bug! Please report it at https://github.com/devenoges/holders/issues/new");
    }));
}
