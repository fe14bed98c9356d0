/// Picks the config with the most MSAA samples; the first one wins ties.
pub fn pick_config<C>(
    configs: impl Iterator<Item = C>,
    samples: impl Fn(&C) -> u8,
) -> Option<C> {
    configs.reduce(|accum, config| {
        if samples(&config) > samples(&accum) {
            config
        } else {
            accum
        }
    })
}
