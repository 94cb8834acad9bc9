/// Install the platform logger: the browser console on wasm, `env_logger`
/// (default level `info`, `RUST_LOG` overrides) elsewhere. Safe to call more
/// than once.
pub fn init() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::debug!("logger already initialised");
            }
        } else {
            let env = env_logger::Env::default().default_filter_or("info");
            if env_logger::Builder::from_env(env).try_init().is_err() {
                log::debug!("logger already initialised");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_is_harmless() {
        super::init();
        super::init();
        log::info!("logging initialised");
    }
}
