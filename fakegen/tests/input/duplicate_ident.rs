mod posix {
    unsafe extern "C" {
        #[link_name = "posix_read"]
        pub fn read(fd: i32) -> i32;
    }
}

mod win {
    unsafe extern "C" {
        #[link_name = "_read"]
        pub fn read(fd: i32) -> i32;
    }
}
