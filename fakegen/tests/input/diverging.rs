unsafe extern "C" {
    pub fn panic_handler(code: i32) -> !;
}
