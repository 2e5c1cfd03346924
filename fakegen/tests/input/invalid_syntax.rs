unsafe extern "C" {
    pub fn broken(a: u8 -> u8;
}
