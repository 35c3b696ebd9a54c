/// A GPU buffer that is reallocated when a frame outgrows it.
///
/// Capacity is counted in elements of `element_size` bytes and grows to the
/// next power of two above twice the requested length.
#[derive(Debug)]
pub(crate) struct GrowableBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    element_size: u64,
    capacity: usize,
    buffer: wgpu::Buffer,
}

impl GrowableBuffer {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        element_size: u64,
        capacity: usize,
    ) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let buffer = Self::allocate(device, label, usage, element_size, capacity);
        Self {
            label,
            usage,
            element_size,
            capacity,
            buffer,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        element_size: u64,
        capacity: usize,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity.max(1) as u64 * element_size,
            usage,
            mapped_at_creation: false,
        })
    }

    /// Make room for `len` elements. Returns true if the buffer was replaced,
    /// which invalidates bind groups built on it.
    pub fn reserve(&mut self, device: &wgpu::Device, len: usize) -> bool {
        if len <= self.capacity {
            return false;
        }
        let capacity = grown_capacity(len);
        log::debug!(
            "Growing {} from {} to {} elements",
            self.label,
            self.capacity,
            capacity
        );
        self.capacity = capacity;
        self.buffer = Self::allocate(device, self.label, self.usage, self.element_size, capacity);
        true
    }

    /// Upload `data` at the start of the buffer, growing it first if needed.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let grown = self.reserve(device, data.len());
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        grown
    }

    /// Upload raw bytes, where one element is `element_size` bytes.
    pub fn write_bytes(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> bool {
        let len = (bytes.len() as u64).div_ceil(self.element_size) as usize;
        let grown = self.reserve(device, len);
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        grown
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

fn grown_capacity(len: usize) -> usize {
    (len * 2).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_is_power_of_two() {
        assert_eq!(grown_capacity(1), 2);
        assert_eq!(grown_capacity(1025), 4096);
        assert_eq!(grown_capacity(3000), 8192);
    }
}
