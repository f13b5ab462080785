//! Architecture Verification Suite
//!
//! Compile-time checks on the seams between generator, sorters, player
//! and renderers.

#[cfg(test)]
mod architecture_tests {
    use sortviz::render::{JsonLinesRenderer, NullRenderer, TextRenderer};
    use sortviz::{FrameStream, Player, Renderer};

    // Frame streams move into playback tasks
    #[test]
    fn test_streams_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FrameStream>();
    }

    // One player is shared between the UI loop and the playback task
    #[test]
    fn test_player_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Player>();
    }

    #[test]
    fn test_renderers_implement_the_trait() {
        fn assert_renderer<T: Renderer + 'static>() {}
        assert_renderer::<NullRenderer>();
        assert_renderer::<TextRenderer<Vec<u8>>>();
        assert_renderer::<JsonLinesRenderer<std::io::Stdout>>();
    }
}
