unsafe extern "C" {
    pub fn only_dots(...);
}
