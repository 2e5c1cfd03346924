unsafe extern "C" {
    pub fn reset_device();
    #[link_name = "reset_device"]
    pub fn reset_device_again();
}
