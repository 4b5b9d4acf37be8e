/*!
Macro helpers for the parser and reader.

These macros perform checked versions of unsafe operations in debug tests
or when the `checked` cfg is enabled just to try catch any UB early.
*/

macro_rules! get_unchecked {
    ($slice:expr, $index:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            ($slice)
                .get($index)
                .expect("attempt to index out of bounds")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            // SAFETY: the index must always be in bounds
            #[allow(unused_unsafe)]
            unsafe {
                ($slice).get_unchecked($index)
            }
        }
    }};
}

macro_rules! from_utf8_unchecked {
    ($str:expr) => {{
        #[cfg(any(all(test, debug), checked))]
        {
            std::str::from_utf8($str).expect("invalid utf8")
        }

        #[cfg(not(any(all(test, debug), checked)))]
        {
            // SAFETY: the input must always be valid UTF8
            #[allow(unused_unsafe)]
            unsafe {
                std::str::from_utf8_unchecked($str)
            }
        }
    }};
}

macro_rules! test_assert {
    ($($tokens:tt)*) => {{
        #[cfg(test)]
        {
            debug_assert!($($tokens)*);
        }
    }};
}
