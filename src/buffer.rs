use core::fmt;

/// A generic row-major 2-dimensional buffer.
///
/// This type holds colour data (see [`FrameBuffer`]), depth data, or texel data.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Buffer2d<T> {
    size: [usize; 2],
    items: Vec<T>,
}

/// A colour target: 4 bytes per pixel, in R, G, B, A order.
pub type FrameBuffer = Buffer2d<[u8; 4]>;

impl<T> Buffer2d<T> {
    /// Create a new buffer with the given size, filled with duplicates of the given element.
    #[inline]
    pub fn fill(size: [usize; 2], item: T) -> Self
    where
        T: Clone,
    {
        Self::fill_with(size, || item.clone())
    }

    /// Create a new buffer with the given size, filled by calling the function for each element.
    ///
    /// If your type implements [`Clone`], use [`Buffer2d::fill`] instead.
    #[inline]
    pub fn fill_with<F: FnMut() -> T>(size: [usize; 2], mut f: F) -> Self {
        let len = size[0].saturating_mul(size[1]);
        Self {
            size,
            items: (0..len).map(|_| f()).collect(),
        }
    }

    /// Wrap an existing vector of items. Returns `None` if the length does not match the size.
    pub fn from_vec(size: [usize; 2], items: Vec<T>) -> Option<Self> {
        if size[0].checked_mul(size[1]) == Some(items.len()) {
            Some(Self { size, items })
        } else {
            None
        }
    }

    /// Get the size of the buffer, in items.
    #[inline(always)]
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.size[0]
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.size[1]
    }

    /// Convert the given index into a linear index that can be used to index into the raw data of this buffer.
    #[inline(always)]
    pub fn linear_index(&self, [x, y]: [usize; 2]) -> usize {
        y * self.size[0] + x
    }

    /// Whether the given position lies within the buffer.
    #[inline(always)]
    pub fn contains(&self, [x, y]: [usize; 2]) -> bool {
        x < self.size[0] && y < self.size[1]
    }

    /// View this buffer as a linear slice of elements.
    #[inline]
    pub fn raw(&self) -> &[T] {
        &self.items
    }

    /// View this buffer as a linear mutable slice of elements.
    #[inline]
    pub fn raw_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Get a reference to the item at the given position, if it is within bounds.
    #[inline]
    pub fn get(&self, pos: [usize; 2]) -> Option<&T> {
        if self.contains(pos) {
            self.items.get(self.linear_index(pos))
        } else {
            None
        }
    }

    /// Clear the entire buffer with copies of the given item.
    #[inline]
    pub fn clear(&mut self, item: T)
    where
        T: Clone,
    {
        self.items.iter_mut().for_each(|e| *e = item.clone());
    }
}

impl<T: Clone> Buffer2d<T> {
    /// Read a copy of the item at the given position.
    ///
    /// # Panics
    ///
    /// This function will panic if the position is not within bounds.
    #[inline]
    pub fn read(&self, pos: [usize; 2]) -> T {
        self.get(pos)
            .unwrap_or_else(|| {
                panic!(
                    "Attempted to read buffer of size {:?} at out-of-bounds location {:?}",
                    self.size, pos
                )
            })
            .clone()
    }
}

impl FrameBuffer {
    /// Flatten the pixels into a row-major RGBA byte vector.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.items.iter().flatten().copied().collect()
    }

    /// Copy the pixels into an [`image::RgbaImage`].
    #[cfg(feature = "image")]
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.size[0] as u32, self.size[1] as u32, self.to_rgba_bytes())
    }
}

impl<T> fmt::Debug for Buffer2d<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Buffer2d(dimensions: {:?})", self.size)
    }
}
