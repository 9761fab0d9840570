// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use caravan_engine::{
    lockfree::LockFreePool,
    task::{BoxedTask, Task, TaskError, TaskPool},
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::thread;

struct LeafTask;

impl Task for LeafTask {
    fn split(&mut self, _pool: &dyn TaskPool) -> Result<usize, TaskError> {
        Ok(0)
    }

    fn merge(&mut self, _pool: &dyn TaskPool) -> Result<(), TaskError> {
        Ok(())
    }

    fn solve(&mut self) -> Result<(), TaskError> {
        Ok(())
    }

    fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LeafTask")
    }
}

fn leaf() -> BoxedTask {
    Box::new(LeafTask)
}

fn bench_uncontended_push_pop(c: &mut Criterion) {
    c.bench_function("lockfree_pool_push_pop_1024", |b| {
        let pool = LockFreePool::new();
        b.iter(|| {
            for _ in 0..1024 {
                pool.push(leaf());
            }
            while pool.pop().is_some() {}
        });
    });
}

fn bench_contended_push_pop(c: &mut Criterion) {
    c.bench_function("lockfree_pool_contended_4x4", |b| {
        b.iter(|| {
            let pool = LockFreePool::new();
            thread::scope(|scope| {
                for _ in 0..4 {
                    let pool = &pool;
                    scope.spawn(move || {
                        for _ in 0..256 {
                            pool.push(leaf());
                        }
                    });
                }
                for _ in 0..4 {
                    let pool = &pool;
                    scope.spawn(move || {
                        let mut received = 0;
                        while received < 256 {
                            if pool.pop().is_some() {
                                received += 1;
                            } else {
                                thread::yield_now();
                            }
                        }
                    });
                }
            });
        });
    });
}

criterion_group!(benches, bench_uncontended_push_pop, bench_contended_push_pop);
criterion_main!(benches);
